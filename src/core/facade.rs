//! # Framework Facades / 测试框架外观
//!
//! A facade knows one native test framework's command-line protocol: how to
//! recognise an executable built with it, how to ask it for its test cases,
//! how to run a single case and how to read the failures it reports.
//!
//! Facades never spawn processes themselves. They describe the arguments of
//! each invocation and parse what the caller captured, which keeps them pure
//! and lets discovery, listing and execution share one process layer.
//!
//! 外观了解某个原生测试框架的命令行协议：如何识别用它构建的可执行文件、
//! 如何列出测试用例、如何运行单个用例以及如何读取报告的失败。
//! 外观本身从不派生进程，只描述每次调用的参数并解析调用方捕获的输出。

pub mod boost;
pub mod google;

use crate::core::models::{CaseId, Failure};
use crate::infra::command::Captured;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use boost::BoostTestFacade;
pub use google::GoogleTestFacade;

/// What a facade could read from the output of a single test run.
/// 外观从单次测试运行的输出中读取到的内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRun {
    /// Structured failure records, in emitted order; empty when the framework
    /// reported none.
    /// 按输出顺序排列的结构化失败记录；框架未报告失败时为空。
    Records(Vec<Failure>),
    /// The framework reported the case as skipped or disabled.
    /// 框架报告该用例被跳过或禁用。
    Skipped(String),
    /// No structured result could be found in the output.
    /// 输出中找不到任何结构化结果。
    Unrecognized,
}

/// The command-line protocol of one native test framework.
/// 单个原生测试框架的命令行协议。
pub trait Facade: fmt::Debug + Send + Sync {
    /// Human-readable framework name.
    fn name(&self) -> &'static str;

    /// Arguments of the cheap probe used to recognise the framework.
    fn probe_args(&self) -> Vec<OsString> {
        vec!["--help".into()]
    }

    /// Decides from the probe's output whether the executable was built with
    /// this framework.
    /// 根据探测输出判断可执行文件是否使用此框架构建。
    fn is_test_suite(&self, probe: &Captured) -> bool;

    /// Arguments that make the executable list its cases without running them.
    fn list_args(&self) -> Vec<OsString>;

    /// Parses the listing output into fully qualified case identifiers.
    /// 将列举输出解析为完全限定的用例标识符。
    fn parse_case_list(&self, listing: &Captured) -> Vec<CaseId>;

    /// Arguments that run only `case`. `scratch` is a private directory the
    /// facade may ask the framework to write reports into.
    /// 仅运行 `case` 的参数。`scratch` 是外观可以让框架写入报告的私有目录。
    fn run_args(&self, case: &CaseId, scratch: &Path) -> Vec<OsString>;

    /// Parses the output of a run of `case`. Must never panic on malformed or
    /// truncated output.
    /// 解析 `case` 运行的输出。对于格式错误或被截断的输出绝不能 panic。
    fn parse_run(&self, case: &CaseId, run: &Captured, scratch: &Path) -> ParsedRun;
}

/// The supported facades in detection order. The first facade that claims an
/// executable owns it.
/// 按检测顺序排列的受支持外观。第一个认领可执行文件的外观拥有它。
pub fn default_facades() -> Vec<Arc<dyn Facade>> {
    vec![Arc::new(GoogleTestFacade), Arc::new(BoostTestFacade)]
}

/// Splits a `file:line` location. A missing or non-numeric line leaves the
/// line absent; `unknown file` and empty locations yield neither part.
pub(crate) fn split_colon_location(location: &str) -> (Option<String>, Option<u32>) {
    let location = location.trim();
    if location.is_empty() || location == "unknown file" {
        return (None, None);
    }
    match location.rsplit_once(':') {
        Some((file, line)) if !file.is_empty() => match line.trim().parse::<u32>() {
            Ok(line) => (Some(file.to_string()), Some(line)),
            Err(_) => (Some(location.to_string()), None),
        },
        _ => (Some(location.to_string()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_checks_googletest_first() {
        let names: Vec<_> = default_facades().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["GoogleTest", "Boost.Test"]);
    }

    #[test]
    fn split_colon_location_variants() {
        assert_eq!(
            split_colon_location("math_test.cc:17"),
            (Some("math_test.cc".into()), Some(17))
        );
        assert_eq!(
            split_colon_location("C:\\src\\math_test.cc:17"),
            (Some("C:\\src\\math_test.cc".into()), Some(17))
        );
        assert_eq!(split_colon_location("math_test.cc"), (Some("math_test.cc".into()), None));
        assert_eq!(split_colon_location("unknown file"), (None, None));
        assert_eq!(split_colon_location(""), (None, None));
    }
}
