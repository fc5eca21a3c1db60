//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the facades, the case
//! runner and the reporters: parsed failures, test case identifiers, case
//! outcomes and the aggregated results of a whole run.
//!
//! 此模块定义了外观、用例运行器和报告器共享的数据结构：
//! 解析出的失败、测试用例标识符、用例结果以及整个运行的汇总结果。

use crate::infra::t;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One parsed failure: an assertion, an exception or a synthetic record
/// describing an abnormal termination.
/// 一个解析出的失败：断言、异常或描述异常终止的合成记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    file: Option<String>,
    line: Option<u32>,
    message: String,
}

impl Failure {
    /// Creates a failure with an optional source location.
    /// 创建带有可选源位置的失败记录。
    pub fn new(file: Option<String>, line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            message: message.into(),
        }
    }

    /// Creates a failure located at `file:line`.
    pub fn at(file: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self::new(Some(file.into()), Some(line), message)
    }

    /// Creates a failure without any source location.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(None, None, message)
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Formats the source location as `file:line`, `file`, or `None` when the
    /// file is unknown.
    /// 将源位置格式化为 `file:line`、`file`，文件未知时返回 `None`。
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            (Some(file), None) => Some(file.clone()),
            (None, _) => None,
        }
    }
}

/// Identifier of a single test case inside one executable, in the naming
/// convention of its framework (`Suite.Case` for GoogleTest, `Suite/Case`
/// for Boost.Test).
/// 单个可执行文件中测试用例的标识符，遵循其框架的命名约定。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CaseId(String);

impl CaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CaseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<&str> for CaseId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The outcome of running one test case.
/// 运行单个测试用例的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The case ran and reported no failures.
    /// 用例运行且没有报告任何失败。
    Passed,
    /// The case failed; the sequence is never empty and keeps the order in
    /// which the failures were emitted.
    /// 用例失败；该序列永不为空，并保持失败被输出的顺序。
    Failed(Vec<Failure>),
    /// The framework reported the case as skipped or disabled.
    /// 框架报告该用例被跳过或禁用。
    Skipped(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// The failures carried by this outcome; empty unless it is `Failed`.
    pub fn failures(&self) -> &[Failure] {
        match self {
            Outcome::Failed(failures) => failures,
            _ => &[],
        }
    }
}

/// Final status of one case within a run, including the cases that could not
/// be executed at all.
/// 一次运行中单个用例的最终状态，包括根本无法执行的用例。
#[derive(Debug, Clone, Serialize)]
pub enum CaseStatus {
    Passed,
    Failed(Vec<Failure>),
    Skipped(String),
    /// The case could not be executed, e.g. the executable or emulator failed to start.
    /// 用例无法执行，例如可执行文件或模拟器无法启动。
    Errored(String),
    /// The run was interrupted before this case finished.
    /// 运行在此用例完成前被中断。
    Cancelled,
}

impl From<Outcome> for CaseStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Passed => CaseStatus::Passed,
            Outcome::Failed(failures) => CaseStatus::Failed(failures),
            Outcome::Skipped(reason) => CaseStatus::Skipped(reason),
        }
    }
}

/// The result of one case, as collected by the `run` command.
/// `run` 命令收集的单个用例结果。
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Path of the executable that contains the case / 包含该用例的可执行文件路径
    pub suite: PathBuf,
    /// Name of the facade that claimed the executable / 认领该可执行文件的外观名称
    pub framework: &'static str,
    pub case: CaseId,
    pub status: CaseStatus,
    pub duration: Option<Duration>,
}

impl CaseReport {
    /// `path::case`, the name used in summaries and listings.
    pub fn display_name(&self) -> String {
        format!("{}::{}", self.suite.display(), self.case)
    }

    /// Returns `true` if this case makes the run fail.
    /// 如果此用例导致整个运行失败，则返回 `true`。
    pub fn is_failure(&self) -> bool {
        matches!(self.status, CaseStatus::Failed(_) | CaseStatus::Errored(_))
    }

    /// Gets the localized status string for the case.
    /// 获取用例的本地化状态字符串。
    pub fn status_str(&self) -> String {
        match &self.status {
            CaseStatus::Passed => t!("report.status_passed").to_string(),
            CaseStatus::Failed(_) => t!("report.status_failed").to_string(),
            CaseStatus::Skipped(_) => t!("report.status_skipped").to_string(),
            CaseStatus::Errored(_) => t!("report.status_errored").to_string(),
            CaseStatus::Cancelled => t!("report.status_cancelled").to_string(),
        }
    }
}

/// An executable that was claimed by a facade but whose cases could not be listed.
/// 已被外观认领但无法列出其用例的可执行文件。
#[derive(Debug, Clone, Serialize)]
pub struct BrokenSuite {
    pub suite: PathBuf,
    pub message: String,
}

/// Everything the `run` command collected.
/// `run` 命令收集的全部结果。
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
    pub broken_suites: Vec<BrokenSuite>,
}

impl RunReport {
    /// Returns `true` if any case failed or errored, or any suite was broken.
    pub fn has_failures(&self) -> bool {
        !self.broken_suites.is_empty() || self.cases.iter().any(CaseReport::is_failure)
    }

    /// Counts cases as (passed, failed, skipped).
    /// 按（通过、失败、跳过）统计用例数量。
    pub fn counts(&self) -> (usize, usize, usize) {
        self.cases
            .iter()
            .fold((0, 0, 0), |(passed, failed, skipped), case| match case.status {
                CaseStatus::Passed => (passed + 1, failed, skipped),
                CaseStatus::Failed(_) | CaseStatus::Errored(_) => (passed, failed + 1, skipped),
                CaseStatus::Skipped(_) | CaseStatus::Cancelled => (passed, failed, skipped + 1),
            })
    }
}
