//! # Commands Module / 命令模块
//!
//! The subcommands of the CLI and the settings they share.
//!
//! CLI 的子命令及其共享的设置。

pub mod init;
pub mod list;
pub mod run;

use anyhow::{Context, Result};
use colored::*;
use futures::{StreamExt, stream};
use std::path::PathBuf;

use crate::core::config::{self, RunnerConfig};
use crate::core::models::{BrokenSuite, CaseId};
use crate::core::{Discoverer, Error, TestSuite};
use crate::infra::{fs, t};

/// Values given on the command line that take precedence over the
/// configuration file.
/// 命令行上给出的、优先于配置文件的值。
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: PathBuf,
    /// `true` when `--config` was given; a missing file is then an error.
    pub config_explicit: bool,
    pub language: Option<String>,
    /// Emulator command line, split like a shell would.
    pub emulator: Option<String>,
    pub arguments: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
}

/// Loads the configuration file (or the defaults when the default file is
/// absent) and applies the command-line overrides.
///
/// 加载配置文件（默认文件不存在时使用默认值）并应用命令行覆盖值。
pub fn load_settings(overrides: &Overrides) -> Result<RunnerConfig> {
    let mut settings = if overrides.config.exists() || overrides.config_explicit {
        let settings = config::load_config(&overrides.config)?;
        eprintln!(
            "{}",
            t!("config.loaded", path = overrides.config.display()).dimmed()
        );
        settings
    } else {
        RunnerConfig::default()
    };

    if let Some(language) = &overrides.language {
        settings.language = Some(language.clone());
    } else if let Some(language) = &settings.language {
        crate::set_language(language);
    }

    if let Some(emulator) = &overrides.emulator {
        settings.emulator = shlex::split(emulator)
            .with_context(|| t!("config.emulator_parse_failed", command = emulator).to_string())?;
    }
    settings.arguments.extend(overrides.arguments.iter().cloned());
    if overrides.timeout_secs.is_some() {
        settings.timeout_secs = overrides.timeout_secs;
    }
    if overrides.jobs.is_some() {
        settings.jobs = overrides.jobs;
    }

    tracing::debug!(?settings, "effective settings");
    Ok(settings)
}

/// Collects the candidate files under `paths` and discovers the test suites
/// among them, keeping the order in which the candidates were found.
///
/// 收集 `paths` 下的候选文件并从中发现测试套件，保持候选文件被找到的顺序。
pub async fn discover_suites(
    paths: &[PathBuf],
    discoverer: &Discoverer,
    jobs: usize,
) -> Vec<TestSuite> {
    let candidates = fs::collect_candidates(paths);
    tracing::debug!(count = candidates.len(), "collected candidates");

    let mut found: Vec<(usize, TestSuite)> = stream::iter(candidates.into_iter().enumerate())
        .map(|(index, candidate)| async move {
            discoverer
                .discover(&candidate.path, candidate.explicit)
                .await
                .map(|suite| (index, suite))
        })
        .buffer_unordered(jobs)
        .filter_map(|suite| async move { suite })
        .collect()
        .await;

    found.sort_by_key(|(index, _)| *index);
    found.into_iter().map(|(_, suite)| suite).collect()
}

/// A discovered suite together with its listed cases.
pub type ListedSuite = (TestSuite, Vec<CaseId>);

/// Lists the cases of every suite. Suites whose listing fails are returned
/// separately as broken instead of aborting the whole command.
///
/// 列出每个套件的用例。列举失败的套件作为损坏套件单独返回，而不会中止整个命令。
pub async fn list_suites(
    suites: Vec<TestSuite>,
    jobs: usize,
) -> (Vec<ListedSuite>, Vec<BrokenSuite>) {
    let mut results: Vec<(usize, TestSuite, Result<Vec<CaseId>, Error>)> =
        stream::iter(suites.into_iter().enumerate())
            .map(|(index, suite)| async move {
                let cases = suite.list_cases().await;
                (index, suite, cases)
            })
            .buffer_unordered(jobs)
            .collect()
            .await;
    results.sort_by_key(|(index, _, _)| *index);

    let mut listed = Vec::new();
    let mut broken = Vec::new();
    for (_, suite, cases) in results {
        match cases {
            Ok(cases) => listed.push((suite, cases)),
            Err(e) => {
                eprintln!(
                    "{}",
                    t!("list.suite_broken", path = suite.path().display(), error = e).red()
                );
                broken.push(BrokenSuite {
                    suite: suite.path().to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }
    (listed, broken)
}
