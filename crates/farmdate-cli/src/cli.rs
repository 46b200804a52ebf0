//! CLI argument definitions for `farmdate`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "farmdate",
    version,
    about = "Validate, parse, and format dates from farm records",
    long_about = "Validate, parse, and format loosely typed dates from farm records.\n\n\
                  Values that are not real calendar dates never fail the command; \
                  they come out as invalid, null, or the fallback text."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML file with `fallback` and `offset` settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Zone offset for values without one and for output (overrides --config).
    #[arg(
        long = "offset",
        value_name = "±HH:MM",
        allow_hyphen_values = true,
        global = true
    )]
    pub offset: Option<String>,

    /// How positional values are read.
    #[arg(long = "input", value_enum, default_value = "text", global = true)]
    pub input: InputModeArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report which values are real calendar dates.
    Validate(ValuesArgs),

    /// Render one value with a format pattern.
    Format(FormatArgs),

    /// Print each value as an RFC 3339 instant, or null.
    Parse(ParseArgs),

    /// Print the whole days from BASE (default: now) to DATE, or null.
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct ValuesArgs {
    /// Values to check.
    #[arg(value_name = "VALUE", required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct FormatArgs {
    /// Value to format.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,

    /// Format pattern, e.g. "yyyy-MM-dd" or "MMM d, yyyy".
    #[arg(long = "pattern", short = 'p')]
    pub pattern: String,

    /// Text printed when the value cannot be formatted (default from config, else "N/A").
    #[arg(long = "fallback")]
    pub fallback: Option<String>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Values to parse.
    #[arg(value_name = "VALUE", required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,

    /// Print a JSON array of {input, date} objects.
    #[arg(long = "json-output")]
    pub json_output: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Date to measure to.
    #[arg(value_name = "DATE", allow_hyphen_values = true)]
    pub date: String,

    /// Date to measure from.
    #[arg(long = "base", value_name = "BASE", allow_hyphen_values = true)]
    pub base: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// CLI input mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum InputModeArg {
    Text,
    Millis,
    Json,
}
