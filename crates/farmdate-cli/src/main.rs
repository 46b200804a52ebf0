//! farmdate CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use farmdate_cli::commands;
use farmdate_cli::input::{InputMode, RawValue, read_values};
use farmdate_cli::logging::{LogConfig, LogFormat, init_logging};
use farmdate_core::{DateNormalizer, NormalizerConfig, parse_offset};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, InputModeArg, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let normalizer = DateNormalizer::new(normalizer_config_from_cli(cli)?);
    let mode = input_mode(cli.input);

    match &cli.command {
        Command::Validate(args) => {
            let mut table = commands::validate(&normalizer, &read_values(&args.values, mode));
            match cli.color.color {
                ColorChoice::Always => {
                    table.enforce_styling();
                }
                ColorChoice::Never => {
                    table.force_no_tty();
                }
                ColorChoice::Auto => {}
            }
            println!("{table}");
        }
        Command::Format(args) => {
            let value = RawValue::read(&args.value, mode);
            println!(
                "{}",
                commands::format(&normalizer, &value, &args.pattern, args.fallback.as_deref())
            );
        }
        Command::Parse(args) => {
            let records = commands::parse(&normalizer, &read_values(&args.values, mode));
            if args.json_output {
                println!(
                    "{}",
                    commands::render_parse_json(&records).context("serialize parse output")?
                );
            } else {
                println!("{}", commands::render_parse_lines(&records));
            }
        }
        Command::Diff(args) => {
            let date = RawValue::read(&args.date, mode);
            let base = args.base.as_deref().map(|base| RawValue::read(base, mode));
            let days = commands::diff(&normalizer, &date, base.as_ref());
            println!("{}", commands::render_diff(days));
        }
    }
    Ok(())
}

/// Build the normalizer config: file first, then `--offset`.
fn normalizer_config_from_cli(cli: &Cli) -> Result<NormalizerConfig> {
    let mut config = match &cli.config {
        Some(path) => NormalizerConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => NormalizerConfig::default(),
    };
    if let Some(offset) = &cli.offset {
        config = config.with_offset(parse_offset(offset).context("parse --offset")?);
    }
    tracing::debug!(fallback = config.fallback(), offset = %config.offset(), "normalizer configured");
    Ok(config)
}

fn input_mode(arg: InputModeArg) -> InputMode {
    match arg {
        InputModeArg::Text => InputMode::Text,
        InputModeArg::Millis => InputMode::Millis,
        InputModeArg::Json => InputMode::Json,
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
