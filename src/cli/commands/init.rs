//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a new runner
//! configuration file, either through a short interactive wizard or, with
//! `--non-interactive`, straight from the defaults.
//!
//! 此模块实现了 `init` 命令，通过简短的交互式向导或（使用 `--non-interactive` 时）
//! 直接根据默认值写入新的运行器配置文件。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::{fs, path::Path};

use crate::core::config::{DEFAULT_MASKS, RunnerConfig};
use crate::infra::t;

const CONFIG_HEADER: &str = "\
# Native test runner configuration / 原生测试运行器配置
#
# masks              File name masks of test executables / 测试可执行文件的文件名掩码
# arguments          Appended to every test case run / 附加到每次测试用例运行
# emulator           Prepended to every invocation / 添加到每次调用之前
# timeout_secs       Timeout for listing and running / 列举和运行的超时时间
# probe_timeout_secs Timeout for framework detection / 框架检测的超时时间
# jobs               Cases run concurrently / 并发运行的用例数量

";

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path of the configuration file to write
/// * `non_interactive` - Write the defaults without prompting
/// * `language` - Language recorded in the new configuration, if any
pub fn execute(output: &Path, non_interactive: bool, language: Option<String>) -> Result<()> {
    let config = if non_interactive {
        if output.exists() {
            println!("{}", t!("init.file_exists", path = output.display()).red());
            return Ok(());
        }
        RunnerConfig {
            language,
            masks: DEFAULT_MASKS.iter().map(|m| m.to_string()).collect(),
            ..RunnerConfig::default()
        }
    } else {
        let theme = ColorfulTheme::default();
        println!("{}", t!("init.welcome").bold());
        if !confirm_overwrite(&theme, output)? {
            println!("{}", t!("init.aborted").yellow());
            return Ok(());
        }
        prompt_for_config(&theme, language)?
    };

    write_config(output, &config)?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success", path = output.display()).bold()
    );
    println!("{}", t!("init.next_steps"));
    Ok(())
}

/// Asks for confirmation before overwriting an existing file.
fn confirm_overwrite(theme: &ColorfulTheme, output: &Path) -> Result<bool> {
    if output.exists() {
        Confirm::with_theme(theme)
            .with_prompt(t!("init.overwrite_prompt", path = output.display()))
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed").to_string())
    } else {
        Ok(true)
    }
}

fn prompt_for_config(theme: &ColorfulTheme, language: Option<String>) -> Result<RunnerConfig> {
    let masks: String = Input::with_theme(theme)
        .with_prompt(t!("init.masks_prompt"))
        .default(DEFAULT_MASKS.join(" "))
        .interact_text()?;

    let emulator: String = Input::with_theme(theme)
        .with_prompt(t!("init.emulator_prompt"))
        .allow_empty(true)
        .interact_text()?;

    let arguments: String = Input::with_theme(theme)
        .with_prompt(t!("init.arguments_prompt"))
        .allow_empty(true)
        .interact_text()?;

    Ok(RunnerConfig {
        language,
        masks: masks.split_whitespace().map(str::to_string).collect(),
        emulator: split_words(&emulator)?,
        arguments: split_words(&arguments)?,
        ..RunnerConfig::default()
    })
}

fn split_words(line: &str) -> Result<Vec<String>> {
    shlex::split(line).with_context(|| t!("config.emulator_parse_failed", command = line).to_string())
}

fn write_config(output: &Path, config: &RunnerConfig) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                t!("init.create_parent_dir_failed", path = parent.display()).to_string()
            })?;
        }
    }

    let body = toml::to_string_pretty(config).context(t!("init.serialize_failed").to_string())?;
    fs::write(output, format!("{CONFIG_HEADER}{body}"))
        .with_context(|| t!("init.write_failed", path = output.display()).to_string())
}
