// src/cli.rs
use anyhow::Result;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

pub mod commands;

use commands::Overrides;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

/// Arguments shared by the commands that discover executables.
fn discovery_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("paths")
            .help(t!("cli.arg_paths").to_string())
            .value_name("PATH")
            .num_args(0..)
            .default_value(".")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Append),
    )
    .arg(
        Arg::new("config")
            .short('c')
            .long("config")
            .help(t!("cli.arg_config").to_string())
            .value_name("CONFIG")
            .default_value(DEFAULT_CONFIG_FILE)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("emulator")
            .long("emulator")
            .help(t!("cli.arg_emulator").to_string())
            .value_name("COMMAND")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("arg")
            .long("arg")
            .help(t!("cli.arg_arg").to_string())
            .value_name("ARG")
            .allow_hyphen_values(true)
            .action(ArgAction::Append),
    )
    .arg(
        Arg::new("timeout")
            .long("timeout")
            .help(t!("cli.arg_timeout").to_string())
            .value_name("SECONDS")
            .value_parser(clap::value_parser!(u64))
            .action(ArgAction::Set),
    )
}

fn build_cli() -> Command {
    Command::new("native-test-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.arg_lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            discovery_args(Command::new("run").about(t!("cli.cmd_run_about").to_string()))
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help(t!("cli.arg_jobs").to_string())
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html").to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("fail-fast")
                        .long("fail-fast")
                        .help(t!("cli.arg_fail_fast").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(discovery_args(
            Command::new("list").about(t!("cli.cmd_list_about").to_string()),
        ))
        .subcommand(
            Command::new("init")
                .about(t!("cli.cmd_init_about").to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output").to_string())
                        .value_name("FILE")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn overrides(matches: &ArgMatches) -> Overrides {
    Overrides {
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        config_explicit: matches.value_source("config") == Some(ValueSource::CommandLine),
        language: matches.get_one::<String>("lang").cloned(),
        emulator: matches.get_one::<String>("emulator").cloned(),
        arguments: matches
            .get_many::<String>("arg")
            .map(|args| args.cloned().collect())
            .unwrap_or_default(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        jobs: matches.try_get_one::<usize>("jobs").ok().flatten().copied(),
    }
}

fn paths(matches: &ArgMatches) -> Vec<PathBuf> {
    matches
        .get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_else(|| vec![PathBuf::from(".")])
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    match pre_parse_language() {
        Some(language) => crate::set_language(&language),
        None => crate::init(),
    }

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let settings = commands::load_settings(&overrides(run_matches))?;
            let html = run_matches.get_one::<PathBuf>("html").cloned();
            let fail_fast = run_matches.get_flag("fail-fast");
            commands::run::execute(paths(run_matches), settings, html, fail_fast).await?;
        }
        Some(("list", list_matches)) => {
            let settings = commands::load_settings(&overrides(list_matches))?;
            commands::list::execute(paths(list_matches), settings).await?;
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let language = init_matches.get_one::<String>("lang").cloned();
            commands::init::execute(&output, init_matches.get_flag("non-interactive"), language)?;
        }
        _ => {
            // Clap has already printed the help text.
        }
    }
    Ok(())
}
