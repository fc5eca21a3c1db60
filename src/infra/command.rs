//! # Command Execution Module / 命令执行模块
//!
//! Spawns one child process, captures its stdout and stderr separately and
//! reports how it terminated. Every listing, probe and test run goes through
//! [`spawn_and_capture`].
//!
//! 派生一个子进程，分别捕获其 stdout 和 stderr，并报告其终止方式。
//! 每次列举、探测和测试运行都通过 [`spawn_and_capture`] 完成。

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// How long the output readers may keep running after a timed out child was killed.
/// Grandchildren that inherited the pipes could otherwise keep them open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// How a child process ended.
/// 子进程的结束方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited with the given code.
    /// 进程以给定的退出码退出。
    Exited(i32),
    /// The process was terminated by the given signal (Unix only).
    /// 进程被给定的信号终止（仅限 Unix）。
    Signaled(i32),
    /// The process exceeded its timeout and was killed.
    /// 进程超时并被终止。
    TimedOut(Duration),
}

impl Termination {
    pub fn success(&self) -> bool {
        matches!(self, Termination::Exited(0))
    }

    /// Returns `true` for terminations that are never part of a normal test
    /// failure: signals and timeouts.
    /// 对于不属于正常测试失败的终止方式（信号和超时）返回 `true`。
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Termination::Signaled(_) | Termination::TimedOut(_))
    }

    fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Termination::Signaled(signal);
            }
        }
        Termination::Exited(-1)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit code {code}"),
            Termination::Signaled(signal) => match signal_name(*signal) {
                Some(name) => write!(f, "signal {signal} ({name})"),
                None => write!(f, "signal {signal}"),
            },
            Termination::TimedOut(after) => write!(f, "timeout after {:.1}s", after.as_secs_f64()),
        }
    }
}

fn signal_name(signal: i32) -> Option<&'static str> {
    Some(match signal {
        4 => "SIGILL",
        6 => "SIGABRT",
        7 => "SIGBUS",
        8 => "SIGFPE",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        15 => "SIGTERM",
        _ => return None,
    })
}

/// Output and termination of one finished child process.
/// 一个已结束子进程的输出和终止方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub termination: Termination,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Builds a capture by hand; used by facades' tests and by callers that
    /// already hold the output.
    pub fn new(termination: Termination, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            termination,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr.
    /// stdout 后接 stderr。
    pub fn combined(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        combined.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }

    /// The last `max_lines` non-blank lines of the combined output.
    /// 合并输出中最后 `max_lines` 个非空行。
    pub fn tail(&self, max_lines: usize) -> String {
        let combined = self.combined();
        let lines: Vec<&str> = combined.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Builds the command for `program`, optionally wrapped by an emulator
/// prefix: `emulator[0] emulator[1..] program args`.
/// 为 `program` 构建命令，可选地由模拟器前缀包装。
pub fn build_command<I, S>(emulator: &[String], program: &Path, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut cmd = match emulator.split_first() {
        Some((emulator_program, emulator_args)) => {
            let mut cmd = Command::new(emulator_program);
            cmd.args(emulator_args).arg(program);
            cmd
        }
        None => Command::new(program),
    };
    cmd.args(args.into_iter().map(Into::into));
    cmd
}

/// Human-readable form of a command line for diagnostics.
pub fn describe_command(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    std::iter::once(std_cmd.get_program())
        .chain(std_cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spawns a command, captures its stdout and stderr, and waits for it to end.
/// Both streams are read concurrently so a chatty child can never block on a
/// full pipe. If `timeout` elapses the child is killed and the termination is
/// [`Termination::TimedOut`].
///
/// 派生一个命令，捕获其 stdout 和 stderr，并等待其结束。
/// 两个流被并发读取，因此输出较多的子进程不会因管道已满而阻塞。
/// 如果超时，子进程将被终止，终止方式为 [`Termination::TimedOut`]。
///
/// # Returns
/// The captured output, or the I/O error raised while spawning or waiting.
pub async fn spawn_and_capture(
    mut cmd: Command,
    timeout: Option<Duration>,
) -> std::io::Result<Captured> {
    tracing::debug!(command = %describe_command(&cmd), "spawning");

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let stdout_handle = child.stdout.take().map(read_to_string);
    let stderr_handle = child.stderr.take().map(read_to_string);

    let termination = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => Termination::from_status(status?),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("failed to kill timed out child: {e}");
                }
                Termination::TimedOut(limit)
            }
        },
        None => Termination::from_status(child.wait().await?),
    };

    let grace = match termination {
        Termination::TimedOut(_) => Some(DRAIN_GRACE),
        _ => None,
    };
    let stdout = collect(stdout_handle, grace).await;
    let stderr = collect(stderr_handle, grace).await;

    Ok(Captured {
        termination,
        stdout,
        stderr,
    })
}

fn read_to_string<R>(mut stream: R) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Err(e) = stream.read_to_end(&mut buf).await {
            tracing::debug!("output stream closed early: {e}");
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

async fn collect(handle: Option<JoinHandle<String>>, grace: Option<Duration>) -> String {
    let Some(mut handle) = handle else {
        return String::new();
    };
    let joined = match grace {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                return String::new();
            }
        },
        None => handle.await,
    };
    joined.unwrap_or_else(|e| {
        tracing::warn!("failed to join output reader: {e}");
        String::new()
    })
}
