//! # Case Runner Module / 用例运行器模块
//!
//! Runs a single test case and turns what the executable printed and how it
//! terminated into an [`Outcome`].
//!
//! 运行单个测试用例，并将可执行文件的输出及其终止方式转换为 [`Outcome`]。

use crate::core::error::{Error, Result};
use crate::core::facade::ParsedRun;
use crate::core::models::{CaseId, Failure, Outcome};
use crate::core::suite::ExecutableDescriptor;
use crate::infra::command::{Captured, Termination};
use crate::infra::fs;
use std::ffi::OsString;

/// Number of output lines embedded in synthetic failures.
const OUTPUT_TAIL_LINES: usize = 20;

/// Runs `case` once: facade arguments first, then the configured extra
/// arguments, the whole command wrapped by the emulator prefix.
///
/// Each run gets its own scratch directory, so runs of different cases or
/// executables may proceed concurrently.
///
/// 运行 `case` 一次：先是外观参数，然后是配置的额外参数，整个命令由模拟器前缀包装。
/// 每次运行都有自己的临时目录，因此不同用例或可执行文件的运行可以并发进行。
///
/// # Returns
/// The outcome of the case, or [`Error::Spawn`] if the executable (or the
/// emulator) could not be started.
pub async fn run_case(descriptor: &ExecutableDescriptor, case: &CaseId) -> Result<Outcome> {
    let scratch = fs::scratch_dir().map_err(Error::Scratch)?;

    let mut args = descriptor.facade.run_args(case, scratch.path());
    args.extend(descriptor.arguments.iter().map(OsString::from));

    let captured = descriptor.invoke(args, descriptor.timeout).await?;
    let parsed = descriptor.facade.parse_run(case, &captured, scratch.path());
    let outcome = decide(parsed, &captured);

    tracing::debug!(
        case = %case,
        termination = %captured.termination,
        passed = outcome.is_passed(),
        "case finished"
    );
    Ok(outcome)
}

/// Combines the parsed output with the process termination.
///
/// A run that reports no failures but did not exit cleanly is never a pass:
/// it yields one synthetic failure. Signals and timeouts are appended even
/// when failure records were parsed, because the records may be incomplete.
///
/// 将解析后的输出与进程终止方式结合。
/// 未报告失败但未正常退出的运行绝不算通过：它会产生一个合成失败。
pub fn decide(parsed: ParsedRun, captured: &Captured) -> Outcome {
    match parsed {
        ParsedRun::Skipped(reason) => Outcome::Skipped(reason),
        ParsedRun::Records(mut failures) if !failures.is_empty() => {
            if captured.termination.is_abnormal() {
                failures.push(abnormal_termination(captured));
            }
            Outcome::Failed(failures)
        }
        ParsedRun::Records(_) if captured.termination.success() => Outcome::Passed,
        ParsedRun::Unrecognized if captured.termination.success() => {
            Outcome::Failed(vec![unparsed_output(captured)])
        }
        ParsedRun::Records(_) | ParsedRun::Unrecognized => {
            Outcome::Failed(vec![abnormal_termination(captured)])
        }
    }
}

/// The synthetic failure describing a run that ended badly without telling why.
/// 描述运行异常结束但未说明原因的合成失败。
pub fn abnormal_termination(captured: &Captured) -> Failure {
    let summary = match captured.termination {
        Termination::Exited(code) => {
            format!("test executable exited with code {code} without reporting a failure")
        }
        Termination::Signaled(_) => {
            format!("test executable terminated abnormally by {}", captured.termination)
        }
        Termination::TimedOut(limit) => format!(
            "test executable did not finish within {:.1}s and was killed",
            limit.as_secs_f64()
        ),
    };
    Failure::message_only(with_output(summary, captured))
}

/// The failure reported when a cleanly exiting run produced no result the
/// facade could read.
/// 当正常退出的运行没有产生外观可读取的结果时报告的失败。
pub fn unparsed_output(captured: &Captured) -> Failure {
    Failure::message_only(with_output(
        "test executable exited successfully but its result could not be parsed".to_string(),
        captured,
    ))
}

fn with_output(summary: String, captured: &Captured) -> String {
    let tail = captured.tail(OUTPUT_TAIL_LINES);
    if tail.is_empty() {
        summary
    } else {
        format!("{summary}\n\ncaptured output:\n{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn captured(termination: Termination) -> Captured {
        Captured::new(termination, "", "")
    }

    #[test]
    fn clean_exit_without_records_passes() {
        let outcome = decide(ParsedRun::Records(vec![]), &captured(Termination::Exited(0)));
        assert_eq!(outcome, Outcome::Passed);
    }

    #[test]
    fn records_are_kept_as_they_are_on_ordinary_failure_exit() {
        let records = vec![Failure::at("a.cc", 10, "one"), Failure::at("a.cc", 42, "two")];
        let outcome = decide(ParsedRun::Records(records.clone()), &captured(Termination::Exited(1)));
        assert_eq!(outcome, Outcome::Failed(records));
    }

    #[test]
    fn crash_without_records_yields_one_synthetic_failure() {
        let run = Captured::new(Termination::Signaled(11), "partial line\n", "");
        let outcome = decide(ParsedRun::Unrecognized, &run);
        let failures = outcome.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].file(), None);
        assert!(failures[0].message().contains("SIGSEGV"));
        assert!(failures[0].message().contains("partial line"));
    }

    #[test]
    fn nonzero_exit_without_records_is_never_a_pass() {
        let outcome = decide(ParsedRun::Records(vec![]), &captured(Termination::Exited(3)));
        assert_eq!(outcome.failures().len(), 1);
        assert!(outcome.failures()[0].message().contains("exited with code 3"));
    }

    #[test]
    fn timeout_is_appended_to_parsed_records() {
        let records = vec![Failure::at("a.cc", 1, "first")];
        let outcome = decide(
            ParsedRun::Records(records),
            &captured(Termination::TimedOut(Duration::from_secs(2))),
        );
        let failures = outcome.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[1].message().contains("within 2.0s"));
    }

    #[test]
    fn unreadable_result_after_clean_exit_is_unparsed_output() {
        let outcome = decide(ParsedRun::Unrecognized, &captured(Termination::Exited(0)));
        assert_eq!(outcome.failures().len(), 1);
        assert!(outcome.failures()[0].message().contains("could not be parsed"));
    }

    #[test]
    fn skipped_wins_over_exit_status() {
        let outcome = decide(ParsedRun::Skipped("disabled".into()), &captured(Termination::Exited(0)));
        assert_eq!(outcome, Outcome::Skipped("disabled".into()));
    }
}
