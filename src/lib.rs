//! # Native Test Runner Library / 原生测试运行器库
//!
//! This library discovers test executables built with GoogleTest or Boost.Test
//! and exposes every test case inside them as an individually runnable and
//! reportable item.
//!
//! 此库发现使用 GoogleTest 或 Boost.Test 构建的测试可执行文件，
//! 并将其中的每个测试用例作为可单独运行和报告的条目公开。
//!
//! ## Modules / 模块
//!
//! - `core` - Failure model, facades, discovery and the case runner
//! - `infra` - Child process execution and file system helpers
//! - `reporting` - Failure rendering, console summaries and HTML reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 失败模型、框架外观、发现与用例运行器
//! - `infra` - 子进程执行和文件系统辅助功能
//! - `reporting` - 失败渲染、控制台摘要和 HTML 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::discovery;
pub use core::execution;
pub use core::models;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    set_language(&locale);
}

/// Sets the UI language, falling back from the full locale to its language
/// code and finally to "en".
pub fn set_language(locale: &str) {
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
