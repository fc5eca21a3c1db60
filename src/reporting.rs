//! # Reporting Module / 报告模块
//!
//! This module turns failure sequences and run results into human-readable
//! output: plain multi-section failure reports, colourful console summaries
//! and standalone HTML reports.
//!
//! 此模块将失败序列和运行结果转换为人类可读的输出：
//! 纯文本多段失败报告、彩色控制台摘要和独立的 HTML 报告。

pub mod console;
pub mod failure;
pub mod html;

// Re-export common reporting functions
pub use console::{print_case_result, print_failure_details, print_summary};
pub use failure::render;
pub use html::generate_html_report;
