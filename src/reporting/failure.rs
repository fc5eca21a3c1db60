//! # Failure Rendering Module / 失败渲染模块
//!
//! Renders a failure sequence as plain text, one section per failure, in the
//! order received.
//!
//! 将失败序列渲染为纯文本，每个失败一段，保持接收顺序。

use crate::core::models::Failure;
use std::fmt;

/// Text rendered for an empty failure sequence.
pub const NO_FAILURES: &str = "no failures";

/// A borrowed failure sequence that displays as a multi-section report.
///
/// ```text
/// math_test.cc:17: failure
/// expected 5 got 4
///
/// test executable terminated abnormally by signal 11 (SIGSEGV)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FailureReport<'a> {
    failures: &'a [Failure],
}

impl<'a> FailureReport<'a> {
    pub fn new(failures: &'a [Failure]) -> Self {
        Self { failures }
    }
}

impl fmt::Display for FailureReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str(NO_FAILURES);
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            if let Some(location) = failure.location() {
                writeln!(f, "{location}: failure")?;
            }
            f.write_str(failure.message())?;
        }
        Ok(())
    }
}

/// Renders `failures` as a multi-section report.
/// 将 `failures` 渲染为多段报告。
pub fn render(failures: &[Failure]) -> String {
    FailureReport::new(failures).to_string()
}
