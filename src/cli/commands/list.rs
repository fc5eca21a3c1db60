//! # List Command Module / 列举命令模块
//!
//! Prints every discovered test case as `path::case`, one per line, without
//! running anything.
//!
//! 以 `path::case` 的形式逐行打印每个已发现的测试用例，不运行任何内容。

use anyhow::Result;
use std::path::PathBuf;

use crate::core::{Discoverer, config::RunnerConfig};
use crate::infra::t;

use super::{discover_suites, list_suites};

pub async fn execute(paths: Vec<PathBuf>, settings: RunnerConfig) -> Result<()> {
    let jobs = settings.jobs();
    let discoverer = Discoverer::new(&settings)?;

    let suites = discover_suites(&paths, &discoverer, jobs).await;
    let (listed, broken) = list_suites(suites, jobs).await;

    for (suite, cases) in &listed {
        for case in cases {
            println!("{}::{}", suite.path().display(), case);
        }
    }

    if !broken.is_empty() {
        anyhow::bail!(t!("list.failed", count = broken.len()).to_string());
    }
    Ok(())
}
