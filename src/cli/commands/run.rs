//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which discovers the test
//! executables under the given paths, lists their cases and runs every case
//! as its own process.
//!
//! 此模块实现了 `run` 命令：发现给定路径下的测试可执行文件，列出其用例，
//! 并将每个用例作为独立进程运行。

use anyhow::Result;
use colored::*;
use futures::{StreamExt, stream};
use std::path::PathBuf;
use std::time::Instant;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        Discoverer, TestCase,
        config::RunnerConfig,
        models::{CaseReport, CaseStatus, RunReport},
    },
    infra::t,
    reporting::{
        console::{print_case_result, print_failure_details, print_summary},
        html::generate_html_report,
    },
};

use super::{discover_suites, list_suites};

/// Executes the run command.
///
/// # Arguments
/// * `paths` - Files and directories to search for test executables
/// * `settings` - Effective settings after command-line overrides
/// * `html` - Optional path for HTML report output
/// * `fail_fast` - Stop starting new cases after the first failure
///
/// # Returns
/// An error if any case failed or errored, or any suite could not be listed.
pub async fn execute(
    paths: Vec<PathBuf>,
    settings: RunnerConfig,
    html: Option<PathBuf>,
    fail_fast: bool,
) -> Result<()> {
    let jobs = settings.jobs();
    let discoverer = Discoverer::new(&settings)?;
    let overall_stop_token = setup_signal_handler();

    let suites = discover_suites(&paths, &discoverer, jobs).await;
    if suites.is_empty() {
        println!("{}", t!("run.no_suites").yellow());
        return Ok(());
    }
    println!("{}", t!("run.suites_found", count = suites.len()).cyan());

    let (listed, broken_suites) = list_suites(suites, jobs).await;
    let cases: Vec<TestCase> = listed
        .into_iter()
        .flat_map(|(suite, ids)| ids.into_iter().map(move |id| suite.case(id)))
        .collect();

    println!(
        "{}",
        t!("run.running_cases", count = cases.len(), jobs = jobs).bold()
    );

    let report = RunReport {
        cases: run_cases(cases, jobs, fail_fast, overall_stop_token).await,
        broken_suites,
    };

    print_summary(&report);

    if let Some(report_path) = &html {
        println!("\n{}", t!("run.html_generating", path = report_path.display()));
        if let Err(e) = generate_html_report(&report, report_path) {
            eprintln!("{} {}", t!("run.html_failed").red(), e);
        }
    }

    if report.has_failures() {
        print_failure_details(&report);
        anyhow::bail!(t!("run.failed").to_string());
    }

    println!("\n{}", t!("run.all_passed").green().bold());
    Ok(())
}

/// Sets up a signal handler for graceful shutdown.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                println!("\n{}", t!("run.shutdown_signal").yellow());
                token_clone.cancel();
            }
            Err(e) => tracing::warn!("failed to listen for Ctrl-C: {e}"),
        }
    });

    token
}

/// Runs the cases concurrently, at most `jobs` at a time, and returns their
/// reports in the order the cases were given.
///
/// Dropping an in-flight case on cancellation kills its child process.
async fn run_cases(
    cases: Vec<TestCase>,
    jobs: usize,
    fail_fast: bool,
    overall_stop_token: CancellationToken,
) -> Vec<CaseReport> {
    let fast_fail_token = CancellationToken::new();

    let mut reports: Vec<(usize, CaseReport)> = stream::iter(cases.into_iter().enumerate())
        .map(|(index, case)| {
            let overall_stop_token = overall_stop_token.clone();
            let fast_fail_token = fast_fail_token.clone();
            async move {
                let started = Instant::now();
                let status = if overall_stop_token.is_cancelled() || fast_fail_token.is_cancelled() {
                    CaseStatus::Cancelled
                } else {
                    tokio::select! {
                        biased;
                        _ = overall_stop_token.cancelled() => CaseStatus::Cancelled,
                        _ = fast_fail_token.cancelled() => CaseStatus::Cancelled,
                        result = case.run() => match result {
                            Ok(outcome) => CaseStatus::from(outcome),
                            Err(e) => CaseStatus::Errored(e.to_string()),
                        },
                    }
                };

                let duration = match status {
                    CaseStatus::Cancelled => None,
                    _ => Some(started.elapsed()),
                };
                let report = CaseReport {
                    suite: case.suite_path().to_path_buf(),
                    framework: case.framework(),
                    case: case.id().clone(),
                    status,
                    duration,
                };

                if report.is_failure() && fail_fast {
                    fast_fail_token.cancel();
                }
                if !matches!(report.status, CaseStatus::Cancelled) {
                    print_case_result(&report);
                }
                (index, report)
            }
        })
        .buffer_unordered(jobs)
        .collect()
        .await;

    reports.sort_by_key(|(index, _)| *index);
    reports.into_iter().map(|(_, report)| report).collect()
}
