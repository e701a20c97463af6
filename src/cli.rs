// src/cli.rs
use anyhow::{Result, anyhow};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::config::{DEFAULT_CONFIG_FILE, ExecutionMode, Overrides, UnmatchedPolicy};
use crate::infra::t;

pub mod commands;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

/// Installs the `tracing` subscriber. `RUST_LOG` wins; otherwise `--verbose`
/// selects `debug` and the default is `warn`. Logs go to stderr so they never
/// mix with the report on stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn selection_args(locale: &str) -> Vec<Arg> {
    vec![
        Arg::new("prefix")
            .short('p')
            .long("prefix")
            .help(t!("arg_prefix", locale = locale).to_string())
            .value_name("PREFIX")
            .action(ArgAction::Set),
        Arg::new("directory")
            .short('d')
            .long("directory")
            .help(t!("arg_directory", locale = locale).to_string())
            .value_name("DIR")
            .value_delimiter(',')
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Append),
        Arg::new("unmatched")
            .long("unmatched")
            .help(t!("arg_unmatched", locale = locale).to_string())
            .value_name("POLICY")
            .value_parser(PossibleValuesParser::new(["reject", "append"]))
            .action(ArgAction::Set),
        Arg::new("allow-extensions")
            .long("allow-extensions")
            .help(t!("arg_allow_extensions", locale = locale).to_string())
            .action(ArgAction::SetTrue),
        Arg::new("config")
            .short('c')
            .long("config")
            .help(t!("arg_config", locale = locale).to_string())
            .value_name("CONFIG")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
    ]
}

fn build_cli(locale: &str) -> Command {
    Command::new("suite-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli_verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .args(selection_args(locale))
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .help(t!("arg_mode", locale = locale).to_string())
                        .value_name("MODE")
                        .value_parser(PossibleValuesParser::new(["plain", "memcheck"]))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("strict-stderr")
                        .long("strict-stderr")
                        .help(t!("arg_strict_stderr", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help(t!("arg_timeout", locale = locale).to_string())
                        .value_name("SECS")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("list")
                .about(t!("cmd_list_about", locale = locale).to_string())
                .args(selection_args(locale)),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_output", locale = locale).to_string())
                        .value_name("FILE")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Collects the command-line overrides present on a subcommand.
/// Arguments a subcommand does not define are treated as absent.
fn overrides_from(matches: &ArgMatches) -> Result<Overrides> {
    let flag = |id: &str| {
        matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    let string = |id: &str| matches.try_get_one::<String>(id).ok().flatten().cloned();

    let mode = string("mode")
        .map(|m| m.parse::<ExecutionMode>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let unmatched = string("unmatched")
        .map(|u| u.parse::<UnmatchedPolicy>())
        .transpose()
        .map_err(|e| anyhow!(e))?;

    Ok(Overrides {
        prefix: string("prefix"),
        directories: matches
            .try_get_many::<PathBuf>("directory")
            .ok()
            .flatten()
            .map(|dirs| dirs.cloned().collect()),
        mode,
        strict_stderr: flag("strict-stderr"),
        timeout_secs: matches.try_get_one::<u64>("timeout").ok().flatten().copied(),
        unmatched,
        allow_extensions: flag("allow-extensions"),
    })
}

/// Parses the command line, dispatches the subcommand and returns the
/// process exit code.
pub async fn run() -> Result<u8> {
    // Pre-parse language and initialize i18n first.
    let requested_language = pre_parse_language();
    let language = crate::resolve_locale(requested_language.as_deref());
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag("verbose"));
    init_tracing(verbose);

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let config = run_matches.get_one::<PathBuf>("config").cloned();
            let overrides = overrides_from(run_matches)?;
            commands::run::execute(config, overrides, requested_language).await
        }
        Some(("list", list_matches)) => {
            let config = list_matches.get_one::<PathBuf>("config").cloned();
            let overrides = overrides_from(list_matches)?;
            commands::list::execute(config, overrides, requested_language)
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let force = init_matches.get_flag("force");
            commands::init::execute(output, force, &language)
        }
        // `subcommand_required` makes clap exit before reaching this arm.
        _ => Ok(crate::models::EXIT_CONFIG_ERROR),
    }
}
