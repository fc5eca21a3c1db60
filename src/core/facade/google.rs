//! GoogleTest facade.
//!
//! Cases are listed with `--gtest_list_tests` and run one at a time with
//! `--gtest_filter`. Results are read from the JSON report GoogleTest writes
//! with `--gtest_output=json:<file>`.

use super::{Facade, ParsedRun, split_colon_location};
use crate::core::models::{CaseId, Failure};
use crate::infra::command::Captured;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

const REPORT_FILE: &str = "gtest_report.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleTestFacade;

impl Facade for GoogleTestFacade {
    fn name(&self) -> &'static str {
        "GoogleTest"
    }

    fn is_test_suite(&self, probe: &Captured) -> bool {
        probe.combined().contains("--gtest_list_tests")
    }

    fn list_args(&self) -> Vec<OsString> {
        vec!["--gtest_list_tests".into()]
    }

    fn parse_case_list(&self, listing: &Captured) -> Vec<CaseId> {
        parse_listing(&listing.stdout)
    }

    fn run_args(&self, case: &CaseId, scratch: &Path) -> Vec<OsString> {
        let mut output = OsString::from("--gtest_output=json:");
        output.push(scratch.join(REPORT_FILE));
        vec![
            format!("--gtest_filter={case}").into(),
            output,
            "--gtest_color=no".into(),
        ]
    }

    fn parse_run(&self, case: &CaseId, _run: &Captured, scratch: &Path) -> ParsedRun {
        let path = scratch.join(REPORT_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("no GoogleTest report at {}: {e}", path.display());
                return ParsedRun::Unrecognized;
            }
        };
        parse_report(case, &content)
    }
}

/// Parses `--gtest_list_tests` output.
///
/// ```text
/// AddTest.
///   PositiveNumbers
///   Overflow
/// Inst/ParamTest.  # TypeParam = int
///   Case/0  # GetParam() = 1
/// ```
pub fn parse_listing(text: &str) -> Vec<CaseId> {
    let mut suite: Option<&str> = None;
    let mut ids = Vec::new();

    for raw in text.lines() {
        let line = strip_comment(raw).trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(suite) = suite {
                ids.push(CaseId::new(format!("{suite}{}", line.trim())));
            }
        } else if line.ends_with('.') {
            suite = Some(line);
        } else {
            // Banner text such as "Running main() from gtest_main.cc".
            suite = None;
        }
    }
    ids
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

#[derive(Debug, Deserialize)]
struct JsonReport {
    #[serde(default)]
    testsuites: Vec<JsonSuite>,
}

#[derive(Debug, Deserialize)]
struct JsonSuite {
    #[serde(default)]
    name: String,
    #[serde(default)]
    testsuite: Vec<JsonCase>,
}

#[derive(Debug, Deserialize)]
struct JsonCase {
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    failures: Vec<JsonFailure>,
    #[serde(default)]
    skipped: Vec<JsonSkip>,
}

#[derive(Debug, Deserialize)]
struct JsonFailure {
    #[serde(default)]
    failure: String,
}

#[derive(Debug, Deserialize)]
struct JsonSkip {
    #[serde(default)]
    message: String,
}

/// Reads the result of `case` from a GoogleTest JSON report.
pub fn parse_report(case: &CaseId, content: &str) -> ParsedRun {
    let report: JsonReport = match serde_json::from_str(content) {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!("malformed GoogleTest report: {e}");
            return ParsedRun::Unrecognized;
        }
    };

    let all_cases: Vec<(&JsonSuite, &JsonCase)> = report
        .testsuites
        .iter()
        .flat_map(|suite| suite.testsuite.iter().map(move |c| (suite, c)))
        .collect();

    let found = all_cases
        .iter()
        .find(|(suite, c)| format!("{}.{}", suite.name, c.name) == case.as_str())
        .or_else(|| match all_cases.as_slice() {
            [only] => Some(only),
            _ => None,
        });

    let Some((_, result)) = found else {
        return ParsedRun::Unrecognized;
    };

    if !result.failures.is_empty() {
        return ParsedRun::Records(result.failures.iter().map(|f| parse_failure(&f.failure)).collect());
    }
    if result.result.as_deref() == Some("SKIPPED") {
        // Skip messages share the `location\nmessage` layout of failures.
        let reason = result
            .skipped
            .iter()
            .map(|s| parse_failure(&s.message).message().trim().to_string())
            .find(|m| !m.is_empty())
            .unwrap_or_else(|| "skipped".to_string());
        return ParsedRun::Skipped(reason);
    }
    if result.status.as_deref() == Some("NOTRUN") {
        return ParsedRun::Skipped("disabled".to_string());
    }
    ParsedRun::Records(Vec::new())
}

/// A GoogleTest failure text is `location\nmessage`.
fn parse_failure(text: &str) -> Failure {
    match text.split_once('\n') {
        Some((location, message)) => {
            let (file, line) = split_colon_location(location);
            Failure::new(file, line, message.trim_end())
        }
        None => Failure::message_only(text.trim_end()),
    }
}
