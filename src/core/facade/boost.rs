//! Boost.Test facade.
//!
//! Cases are listed with `--list_content` and run one at a time with
//! `--run_test`. Failures are read from the human-readable log, where each
//! record looks like `file(line): error: in "Suite/Case": message`.

use super::{Facade, ParsedRun, split_colon_location};
use crate::core::models::{CaseId, Failure};
use crate::infra::command::Captured;
use std::ffi::OsString;
use std::path::Path;

const INDENT_WIDTH: usize = 4;

/// Record markers, fatal ones first. The last two are the pre-1.59 spelling.
const RECORD_MARKERS: [&str; 4] = [
    ": fatal error: in \"",
    ": error: in \"",
    ": fatal error in \"",
    ": error in \"",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BoostTestFacade;

impl Facade for BoostTestFacade {
    fn name(&self) -> &'static str {
        "Boost.Test"
    }

    fn is_test_suite(&self, probe: &Captured) -> bool {
        let help = probe.combined();
        help.contains("--output_format") && help.contains("log_format")
    }

    fn list_args(&self) -> Vec<OsString> {
        vec!["--list_content".into()]
    }

    fn parse_case_list(&self, listing: &Captured) -> Vec<CaseId> {
        // Boost prints the content tree to stderr.
        let text = if listing.stderr.trim().is_empty() {
            &listing.stdout
        } else {
            &listing.stderr
        };
        parse_listing(text)
    }

    fn run_args(&self, case: &CaseId, _scratch: &Path) -> Vec<OsString> {
        vec![
            format!("--run_test={case}").into(),
            "--log_level=error".into(),
            "--report_level=no".into(),
            "--color_output=no".into(),
        ]
    }

    fn parse_run(&self, _case: &CaseId, run: &Captured, _scratch: &Path) -> ParsedRun {
        // The streams are captured separately, so a record at the end of
        // stdout must not absorb the start of stderr as continuation text.
        let mut records = parse_log(&run.stdout);
        records.extend(parse_log(&run.stderr));
        ParsedRun::Records(records)
    }
}

/// Parses `--list_content` output into `/`-joined paths of the leaf units.
///
/// ```text
/// AddTest*
///     PositiveNumbers*
///     Overflow*: checks wrap-around
/// standalone*
/// ```
pub fn parse_listing(text: &str) -> Vec<CaseId> {
    let entries: Vec<(usize, String)> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            (indent / INDENT_WIDTH, unit_name(line.trim()).to_string())
        })
        .collect();

    let mut path: Vec<&str> = Vec::new();
    let mut ids = Vec::new();
    for (i, (level, name)) in entries.iter().enumerate() {
        path.truncate(*level);
        path.push(name);
        let is_leaf = entries
            .get(i + 1)
            .is_none_or(|(next_level, _)| next_level <= level);
        if is_leaf {
            ids.push(CaseId::new(path.join("/")));
        }
    }
    ids
}

/// Strips the enabled marker `*` and an optional `: description`.
fn unit_name(entry: &str) -> &str {
    let name = match entry.find(": ") {
        Some(pos) => &entry[..pos],
        None => entry,
    };
    name.trim_end().trim_end_matches('*')
}

/// Extracts every error record from a Boost.Test human-readable log, in
/// the order they were written.
pub fn parse_log(text: &str) -> Vec<Failure> {
    let mut failures: Vec<Failure> = Vec::new();
    let mut continuing = false;

    for line in text.lines() {
        let trimmed = line.trim_end();
        if let Some(failure) = parse_record(trimmed) {
            failures.push(failure);
            continuing = true;
            continue;
        }
        if trimmed.trim().is_empty() || trimmed.starts_with("***") {
            continuing = false;
            continue;
        }
        if trimmed.contains("last checkpoint") {
            continue;
        }
        if !continuing {
            continue;
        }
        if let Some(last) = failures.pop() {
            let message = format!("{}\n{}", last.message(), trimmed);
            failures.push(Failure::new(last.file().map(str::to_string), last.line(), message));
        }
    }
    failures
}

fn parse_record(line: &str) -> Option<Failure> {
    let (pos, marker) = RECORD_MARKERS
        .iter()
        .filter_map(|marker| line.find(marker).map(|pos| (pos, *marker)))
        .min_by_key(|(pos, _)| *pos)?;

    let (file, line_no) = split_location(&line[..pos]);
    let rest = &line[pos + marker.len()..];
    let message = match rest.find("\": ") {
        Some(end) => &rest[end + 3..],
        None => rest.split_once('"').map_or(rest, |(_, tail)| tail),
    };
    Some(Failure::new(file, line_no, message.trim()))
}

/// Splits `file(line)` (and the Apple spelling `file:line`).
fn split_location(location: &str) -> (Option<String>, Option<u32>) {
    let location = location.trim();
    if location.is_empty() || location.starts_with("unknown location") {
        return (None, None);
    }
    match location.strip_suffix(')').and_then(|inner| inner.rsplit_once('(')) {
        Some((file, line)) => {
            let line = line.trim().parse::<u32>().ok().filter(|l| *l > 0);
            (Some(file.to_string()), line)
        }
        None => split_colon_location(location),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::command::Termination;

    #[test]
    fn listing_builds_paths_to_leaves() {
        let text = "AddTest*\n    PositiveNumbers*\n    Overflow*: checks wrap-around\nstandalone*\n\n";
        assert_eq!(
            parse_listing(text),
            vec!["AddTest/PositiveNumbers", "AddTest/Overflow", "standalone"]
        );
    }

    #[test]
    fn listing_handles_nested_suites_and_disabled_units() {
        let text = "Outer*\n    Inner*\n        deep*\n        disabled\n    shallow*\nLast*\n";
        assert_eq!(
            parse_listing(text),
            vec!["Outer/Inner/deep", "Outer/Inner/disabled", "Outer/shallow", "Last"]
        );
    }

    #[test]
    fn listing_prefers_stderr() {
        let listing = Captured::new(Termination::Exited(0), "noise\n", "Suite*\n    Case*\n");
        assert_eq!(BoostTestFacade.parse_case_list(&listing), vec!["Suite/Case"]);
        let listing = Captured::new(Termination::Exited(0), "Suite*\n    Case*\n", "");
        assert_eq!(BoostTestFacade.parse_case_list(&listing), vec!["Suite/Case"]);
    }

    #[test]
    fn probe_requires_both_format_options() {
        let help = Captured::new(
            Termination::Exited(0),
            "",
            "  --output_format\n  --log_format\n  --list_content\n",
        );
        assert!(BoostTestFacade.is_test_suite(&help));
        let partial = Captured::new(Termination::Exited(0), "--output_format\n", "");
        assert!(!BoostTestFacade.is_test_suite(&partial));
    }

    #[test]
    fn log_with_two_failures_keeps_order_and_lines() {
        let log = "Running 1 test case...\n\
                   math_test.cpp(10): error: in \"AddTest/Overflow\": check a == b has failed [1 != 2]\n\
                   math_test.cpp(42): error: in \"AddTest/Overflow\": check c == d has failed\n\
                   \n\
                   *** 2 failures are detected in the test module \"Math\"\n";
        assert_eq!(
            parse_log(log),
            vec![
                Failure::at("math_test.cpp", 10, "check a == b has failed [1 != 2]"),
                Failure::at("math_test.cpp", 42, "check c == d has failed"),
            ]
        );
    }

    #[test]
    fn log_exception_without_location() {
        let log = "unknown location(0): fatal error: in \"Suite/Case\": std::runtime_error: boom\n\
                   math_test.cpp(20): last checkpoint: \"Case\" test entry\n";
        assert_eq!(
            parse_log(log),
            vec![Failure::message_only("std::runtime_error: boom")]
        );
    }

    #[test]
    fn log_apple_and_legacy_spellings() {
        let log = "math_test.cpp:17: error: in \"S/C\": expected 5 got 4\n\
                   old_test.cpp(3): error in \"S/C\": legacy message\n";
        assert_eq!(
            parse_log(log),
            vec![
                Failure::at("math_test.cpp", 17, "expected 5 got 4"),
                Failure::at("old_test.cpp", 3, "legacy message"),
            ]
        );
    }

    #[test]
    fn log_appends_continuation_lines() {
        let log = "c.cpp(5): error: in \"S/C\": check { a } == { b } has failed.\n\
                   Mismatch at position 0: 1 != 2\n\
                   \n\
                   Leaving test case\n";
        assert_eq!(
            parse_log(log),
            vec![Failure::at(
                "c.cpp",
                5,
                "check { a } == { b } has failed.\nMismatch at position 0: 1 != 2"
            )]
        );
    }

    #[test]
    fn stderr_is_not_continuation_of_last_stdout_record() {
        let run = Captured::new(
            Termination::Exited(201),
            "math_test.cpp(10): error: in \"S/C\": check a == b has failed\n",
            "warning: leaked 3 objects\nunknown location(0): fatal error: in \"S/C\": boom\n",
        );
        assert_eq!(
            BoostTestFacade.parse_run(&CaseId::from("S/C"), &run, Path::new("/tmp")),
            ParsedRun::Records(vec![
                Failure::at("math_test.cpp", 10, "check a == b has failed"),
                Failure::message_only("boom"),
            ])
        );
    }

    #[test]
    fn log_without_records_is_empty() {
        assert!(parse_log("Running 1 test case...\n\n*** No errors detected\n").is_empty());
        assert!(parse_log("garbage ( ) : \"").is_empty());
    }
}
