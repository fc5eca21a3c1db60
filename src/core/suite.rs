//! # Suite Handle Module / 测试套件句柄模块
//!
//! A [`TestSuite`] is one discovered executable bound to the facade that
//! claimed it. It lists the executable's cases and hands out a [`TestCase`]
//! for each of them.
//!
//! [`TestSuite`] 是一个已发现的可执行文件，绑定到认领它的外观。
//! 它列出可执行文件的用例，并为每个用例提供一个 [`TestCase`]。

use crate::core::error::{Error, Result};
use crate::core::execution;
use crate::core::facade::Facade;
use crate::core::models::{CaseId, Outcome};
use crate::infra::command::{self, Captured};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Everything needed to invoke one test executable. Created once per
/// discovered executable and shared read-only by its suite and cases.
/// 调用单个测试可执行文件所需的全部信息。每个已发现的可执行文件创建一次，
/// 由其套件和用例以只读方式共享。
pub struct ExecutableDescriptor {
    pub path: PathBuf,
    pub facade: Arc<dyn Facade>,
    /// Appended to every test case invocation / 附加到每次测试用例调用
    pub arguments: Vec<String>,
    /// Prepended to every invocation / 添加到每次调用之前
    pub emulator: Vec<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ExecutableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableDescriptor")
            .field("path", &self.path)
            .field("facade", &self.facade.name())
            .field("arguments", &self.arguments)
            .field("emulator", &self.emulator)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ExecutableDescriptor {
    /// Spawns the executable (under the emulator, if any) with `args` and
    /// waits for it to finish.
    pub(crate) async fn invoke<I, S>(&self, args: I, timeout: Option<Duration>) -> Result<Captured>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString>,
    {
        let cmd = command::build_command(&self.emulator, &self.path, args);
        let program = command::describe_command(&cmd);
        command::spawn_and_capture(cmd, timeout)
            .await
            .map_err(|source| Error::Spawn { program, source })
    }
}

/// One test executable claimed by a facade.
/// 被某个外观认领的测试可执行文件。
#[derive(Debug, Clone)]
pub struct TestSuite {
    descriptor: Arc<ExecutableDescriptor>,
}

impl TestSuite {
    pub fn new(descriptor: ExecutableDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
        }
    }

    pub fn path(&self) -> &Path {
        &self.descriptor.path
    }

    /// Name of the framework the executable was built with.
    pub fn framework(&self) -> &'static str {
        self.descriptor.facade.name()
    }

    pub fn descriptor(&self) -> &ExecutableDescriptor {
        &self.descriptor
    }

    /// Lists the identifiers of all cases in the executable without running
    /// them. Every call invokes the executable again.
    ///
    /// A listing that cannot be started, exits unsuccessfully or times out is
    /// an error rather than an empty list, so a broken toolchain is never
    /// mistaken for a suite without tests.
    ///
    /// 列出可执行文件中所有用例的标识符而不运行它们。每次调用都会重新调用可执行文件。
    /// 无法启动、退出失败或超时的列举是错误而不是空列表。
    pub async fn list_cases(&self) -> Result<Vec<CaseId>> {
        let descriptor = &self.descriptor;
        let listing = descriptor
            .invoke(descriptor.facade.list_args(), descriptor.timeout)
            .await?;

        if !listing.termination.success() {
            let mut reason = listing.termination.to_string();
            let tail = listing.tail(10);
            if !tail.is_empty() {
                reason = format!("{reason}\n{tail}");
            }
            return Err(Error::Listing {
                path: descriptor.path.clone(),
                reason,
            });
        }

        let cases = descriptor.facade.parse_case_list(&listing);
        tracing::debug!(
            path = %descriptor.path.display(),
            count = cases.len(),
            "listed test cases"
        );
        Ok(cases)
    }

    /// A handle that runs the case `id` of this executable.
    pub fn case(&self, id: CaseId) -> TestCase {
        TestCase {
            descriptor: Arc::clone(&self.descriptor),
            id,
        }
    }
}

/// One addressable test case inside a [`TestSuite`].
/// [`TestSuite`] 中一个可寻址的测试用例。
#[derive(Debug, Clone)]
pub struct TestCase {
    descriptor: Arc<ExecutableDescriptor>,
    id: CaseId,
}

impl TestCase {
    pub fn id(&self) -> &CaseId {
        &self.id
    }

    pub fn suite_path(&self) -> &Path {
        &self.descriptor.path
    }

    pub fn framework(&self) -> &'static str {
        self.descriptor.facade.name()
    }

    /// Runs the case once and returns its outcome. Fails only when the
    /// executable could not be started.
    /// 运行该用例一次并返回结果。仅当可执行文件无法启动时失败。
    pub async fn run(&self) -> Result<Outcome> {
        execution::run_case(&self.descriptor, &self.id).await
    }
}
