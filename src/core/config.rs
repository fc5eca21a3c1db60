//! # Configuration Module / 配置模块
//!
//! Runner settings loaded from a TOML file (`NativeTest.toml` by default).
//! Every field has a default, so an empty file or no file at all is valid.
//!
//! 从 TOML 文件（默认为 `NativeTest.toml`）加载的运行器设置。
//! 每个字段都有默认值，因此空文件或没有文件都是有效的。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "NativeTest.toml";

/// File name masks used when none are configured.
/// 未配置时使用的文件名掩码。
pub const DEFAULT_MASKS: [&str; 2] = ["test_*", "*_test"];

const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Settings shared by discovery, listing and execution.
/// 发现、列举和执行共享的设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Unset means the system locale.
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。未设置表示使用系统语言。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Glob-style file name masks an executable must match to be collected,
    /// unless it was named explicitly. Empty means the defaults.
    /// 可执行文件必须匹配的 glob 风格文件名掩码（显式指定的除外）。为空表示使用默认值。
    pub masks: Vec<String>,

    /// Extra arguments appended to every test case invocation.
    /// 附加到每次测试用例调用的额外参数。
    pub arguments: Vec<String>,

    /// Command and arguments prepended to every invocation, e.g.
    /// `["qemu-aarch64", "-L", "/usr/aarch64-linux-gnu"]`.
    /// 添加到每次调用之前的命令及其参数。
    pub emulator: Vec<String>,

    /// Timeout in seconds for listing and running; `None` waits forever.
    /// 列举和运行的超时时间（秒）；`None` 表示无限等待。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Timeout in seconds for the `--help` probe that identifies the framework.
    /// 识别测试框架的 `--help` 探测的超时时间（秒）。
    pub probe_timeout_secs: u64,

    /// Number of cases run concurrently. Defaults to half the CPUs plus one.
    /// 并发运行的用例数量。默认为 CPU 数量的一半加一。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: None,
            masks: Vec::new(),
            arguments: Vec::new(),
            emulator: Vec::new(),
            timeout_secs: None,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            jobs: None,
        }
    }
}

impl RunnerConfig {
    /// The configured masks, or the default masks if none are configured.
    /// 已配置的掩码；若未配置则返回默认掩码。
    pub fn effective_masks(&self) -> Vec<String> {
        if self.masks.is_empty() {
            DEFAULT_MASKS.iter().map(|m| m.to_string()).collect()
        } else {
            self.masks.clone()
        }
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn jobs(&self) -> usize {
        self.jobs.filter(|j| *j > 0).unwrap_or_else(|| num_cpus::get() / 2 + 1)
    }

    /// Expands `~` and environment variables in the emulator and argument entries.
    /// 展开模拟器和参数条目中的 `~` 和环境变量。
    pub fn expand(mut self) -> Result<Self> {
        self.emulator = expand_entries(&self.emulator)?;
        self.arguments = expand_entries(&self.arguments)?;
        Ok(self)
    }
}

fn expand_entries(entries: &[String]) -> Result<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            shellexpand::full(entry)
                .map(|expanded| expanded.into_owned())
                .with_context(|| format!("Failed to expand `{entry}`"))
        })
        .collect()
}

/// Parses a configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RunnerConfig> {
    let config: RunnerConfig = toml::from_str(content).context("Failed to parse configuration")?;
    config.expand()
}

/// Loads and parses the configuration file at `path`.
/// 加载并解析 `path` 处的配置文件。
pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid configuration file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.effective_masks(), vec!["test_*", "*_test"]);
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.run_timeout(), None);
    }

    #[test]
    fn full_file_round_trips_into_fields() {
        let config = parse_config(
            r#"
            language = "zh-CN"
            masks = ["*_tests"]
            arguments = ["--verbose"]
            emulator = ["qemu-aarch64", "-L", "/usr/aarch64-linux-gnu"]
            timeout_secs = 30
            probe_timeout_secs = 2
            jobs = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.language.as_deref(), Some("zh-CN"));
        assert_eq!(config.effective_masks(), vec!["*_tests"]);
        assert_eq!(config.arguments, vec!["--verbose"]);
        assert_eq!(config.emulator.len(), 3);
        assert_eq!(config.run_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.jobs(), 4);
    }

    #[test]
    fn zero_jobs_falls_back_to_cpu_based_default() {
        let config = RunnerConfig {
            jobs: Some(0),
            ..RunnerConfig::default()
        };
        assert!(config.jobs() >= 1);
    }

    #[test]
    fn unknown_field_types_are_rejected() {
        assert!(parse_config("masks = 3").is_err());
    }
}
