//! # HTML Reporting Module / HTML 报告模块
//!
//! This module handles the generation of HTML reports.
//! It creates a standalone, styled HTML file with run statistics, one row per
//! test case and the rendered failure report of every failed case.
//!
//! 此模块处理 HTML 报告的生成。
//! 它创建一个独立的样式化 HTML 文件，包含运行统计、每个测试用例一行以及每个失败用例的失败报告。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{CaseReport, CaseStatus, RunReport};
use crate::infra::t;
use crate::reporting::failure::render;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Generates an HTML report from the results of a run and writes it to
/// `output_path`.
///
/// 根据运行结果生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件，则返回错误。
pub fn generate_html_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let markup = render_html(report);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}

/// Builds the report document.
pub fn render_html(report: &RunReport) -> Markup {
    let (passed, failed, skipped) = report.counts();
    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title")) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header")) }
                p class="generated" { (t!("html_report.generated_at", time = generated_at)) }
                div class="summary-container" {
                    (summary_item(report.cases.len(), "", &t!("html_report.summary.total")))
                    (summary_item(passed, "passed-text", &t!("html_report.summary.passed")))
                    (summary_item(failed, "failed-text", &t!("html_report.summary.failed")))
                    (summary_item(skipped, "skipped-text", &t!("html_report.summary.skipped")))
                    @if !report.broken_suites.is_empty() {
                        (summary_item(report.broken_suites.len(), "failed-text", &t!("html_report.summary.broken")))
                    }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name")) }
                            th { (t!("html_report.table.header.framework")) }
                            th class="status-col" { (t!("html_report.table.header.status")) }
                            th class="duration-cell" { (t!("html_report.table.header.duration")) }
                        }
                    }
                    tbody {
                        @for (i, case) in report.cases.iter().enumerate() {
                            (case_rows(i, case))
                        }
                        @for broken in &report.broken_suites {
                            tr {
                                td { (broken.suite.display().to_string()) }
                                td {}
                                td class="status-col" {
                                    div class="status-cell status-broken" { (t!("report.status_broken")) }
                                }
                                td class="duration-cell" { "N/A" }
                            }
                            tr {
                                td colspan="4" { pre class="output-content" { (broken.message) } }
                            }
                        }
                    }
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn case_rows(index: usize, case: &CaseReport) -> Markup {
    let output_id = format!("output-{index}");
    let duration = case
        .duration
        .map(|d| format!("{:.3}s", d.as_secs_f64()))
        .unwrap_or_else(|| "N/A".to_string());
    let details = match &case.status {
        CaseStatus::Failed(failures) => Some(render(failures)),
        CaseStatus::Errored(message) => Some(message.clone()),
        CaseStatus::Skipped(reason) => Some(reason.clone()),
        CaseStatus::Passed | CaseStatus::Cancelled => None,
    };

    html! {
        tr {
            td { (case.display_name()) }
            td { (case.framework) }
            td class="status-col" {
                div class={ "status-cell " (status_class(&case.status)) } { (case.status_str()) }
                @if details.is_some() {
                    div class="output-toggle" onclick=(format!("toggleOutput('{output_id}')")) {
                        (t!("html_report.toggle_output"))
                    }
                }
            }
            td class="duration-cell" { (duration) }
        }
        @if let Some(details) = &details {
            tr id=(output_id) style="display:none;" {
                td colspan="4" { pre class="output-content" { (details) } }
            }
        }
    }
}

fn status_class(status: &CaseStatus) -> &'static str {
    match status {
        CaseStatus::Passed => "status-passed",
        CaseStatus::Failed(_) => "status-failed",
        CaseStatus::Skipped(_) => "status-skipped",
        CaseStatus::Errored(_) => "status-errored",
        CaseStatus::Cancelled => "status-cancelled",
    }
}
