//! CLI argument definitions for rowspec.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowspec",
    version,
    about = "Validate tabular data against declarative interface definitions",
    long_about = "Validate that delimited or fixed-width data files conform to an \
                  interface definition:\na small tabular document describing the data \
                  format, the field formats and cross-row checks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate data files against an interface definition.
    Validate(ValidateArgs),

    /// Show the data format, fields and checks of an interface definition.
    Show(ShowArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the interface definition (a delimited file with D/F/C rows).
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Data files to validate. With no data files, only the definition
    /// itself is checked.
    #[arg(value_name = "DATA")]
    pub data: Vec<PathBuf>,

    /// What to do about data errors.
    #[arg(long = "policy", value_enum, default_value = "raise")]
    pub policy: PolicyArg,

    /// Stop validating after this many data rows per file while still
    /// consuming the rest.
    #[arg(long = "row-limit", value_name = "COUNT")]
    pub row_limit: Option<u64>,

    /// Write a JSON validation report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Path to the interface definition.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Abort a file on the first data error.
    Raise,
    /// Report every data error and keep going.
    Collect,
    /// Drop data errors; exploratory use only.
    Ignore,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
