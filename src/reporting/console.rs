//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the results of a run to the console: a colourful
//! per-case summary table and the failure report of every failed case.
//!
//! 此模块将运行结果打印到控制台：彩色的逐用例摘要表格以及每个失败用例的失败报告。

use colored::*;

use crate::core::models::{CaseReport, CaseStatus, RunReport};
use crate::infra::t;
use crate::reporting::failure::FailureReport;

/// Prints a formatted summary of case results to the console.
/// Displays a table with status, name and duration, using colour coding to
/// highlight different statuses, followed by the totals.
///
/// 在控制台打印格式化的用例结果摘要。
/// 显示一个包含状态、名称和持续时间的表格，使用颜色编码突出显示不同的状态，随后是总计。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed     | build/test_math::AddTest.PositiveNumbers           |      2.10ms
///   - Failed     | build/test_math::AddTest.Overflow                  |      1.95ms
///   - Skipped    | build/test_math::AddTest.DISABLED_Slow             |      1.02ms
/// ```
pub fn print_summary(report: &RunReport) {
    println!("\n{}", t!("summary.banner").bold());

    for case in &report.cases {
        let duration_str = case
            .duration
            .map(|d| format!("{:.2?}", d))
            .unwrap_or_else(|| "N/A".to_string());

        println!(
            "  - {:<10} | {:<50} | {:>10}",
            colored_status(case),
            case.display_name(),
            duration_str
        );
    }

    for broken in &report.broken_suites {
        println!(
            "  - {:<10} | {:<50} |",
            t!("report.status_broken").red(),
            broken.suite.display()
        );
    }

    let (passed, failed, skipped) = report.counts();
    println!(
        "\n{}",
        t!(
            "summary.totals",
            passed = passed,
            failed = failed,
            skipped = skipped,
            broken = report.broken_suites.len()
        )
    );
}

/// Prints one progress line as soon as a case finishes.
/// 每个用例完成时立即打印一行进度。
pub fn print_case_result(case: &CaseReport) {
    println!("[{}] {}", colored_status(case), case.display_name());
}

fn colored_status(case: &CaseReport) -> ColoredString {
    let status = case.status_str();
    match case.status {
        CaseStatus::Passed => status.green(),
        CaseStatus::Failed(_) | CaseStatus::Errored(_) => status.red(),
        CaseStatus::Skipped(_) => status.yellow(),
        CaseStatus::Cancelled => status.dimmed(),
    }
}

/// Prints the failure report of every failed or errored case and the reason
/// every broken suite could not be listed.
///
/// 打印每个失败或出错用例的失败报告，以及每个损坏套件无法被列举的原因。
pub fn print_failure_details(report: &RunReport) {
    let failing: Vec<&CaseReport> = report.cases.iter().filter(|c| c.is_failure()).collect();
    if failing.is_empty() && report.broken_suites.is_empty() {
        return;
    }

    println!("\n{}", t!("summary.failure_banner").red().bold());
    println!("{}", "-".repeat(80));

    let total = failing.len() + report.broken_suites.len();
    for (i, case) in failing.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            total,
            t!("summary.failure_header").red(),
            case.display_name().cyan()
        );
        println!();
        match &case.status {
            CaseStatus::Failed(failures) => print_failures(&FailureReport::new(failures).to_string()),
            CaseStatus::Errored(message) => println!("{}", message),
            _ => {}
        }
        println!("\n{}", "-".repeat(80));
    }

    for (i, broken) in report.broken_suites.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            failing.len() + i + 1,
            total,
            t!("summary.broken_header").red(),
            broken.suite.display().to_string().cyan()
        );
        println!("\n{}", broken.message);
        println!("\n{}", "-".repeat(80));
    }
}

/// Highlights the `file:line: failure` headers of a rendered failure report.
fn print_failures(rendered: &str) {
    for line in rendered.lines() {
        if line.ends_with(": failure") {
            println!("{}", line.red().bold());
        } else {
            println!("{}", line);
        }
    }
}
