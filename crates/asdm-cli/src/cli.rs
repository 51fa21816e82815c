//! CLI argument definitions for the `asdm` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "asdm",
    version,
    about = "Inspect and convert ASDM datasets",
    long_about = "Maintenance tool for ASDM dataset directories.\n\n\
                  Reads the ASDM.xml manifest and the table files it declares, \
                  and writes them back as XML documents or MIME binary messages."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a dataset and write it to another directory.
    Convert(ConvertArgs),

    /// Load every table of a dataset and report row counts.
    Validate(ValidateArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Dataset directory to read.
    #[arg(value_name = "SRC")]
    pub source: PathBuf,

    /// Directory to write the dataset into.
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Storage format for every table (default: keep each table's own format).
    #[arg(long = "format", value_enum)]
    pub format: Option<StorageFormatArg>,

    /// Byte order of binary table files (default: host order).
    #[arg(long = "byte-order", value_enum)]
    pub byte_order: Option<ByteOrderArg>,

    /// Replace an existing dataset in DEST.
    #[arg(long = "overwrite")]
    pub overwrite: bool,

    /// Accept tables holding rows that differ only in their surrogate key.
    #[arg(long = "no-uniqueness-check")]
    pub no_uniqueness_check: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Dataset directory to check.
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Accept tables holding rows that differ only in their surrogate key.
    #[arg(long = "no-uniqueness-check")]
    pub no_uniqueness_check: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageFormatArg {
    Xml,
    Bin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ByteOrderArg {
    Big,
    Little,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_arguments() {
        let cli = Cli::try_parse_from([
            "asdm",
            "convert",
            "in",
            "out",
            "--format",
            "bin",
            "--byte-order",
            "big",
            "--overwrite",
        ])
        .unwrap();
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.source, PathBuf::from("in"));
        assert_eq!(args.destination, PathBuf::from("out"));
        assert_eq!(args.format, Some(StorageFormatArg::Bin));
        assert_eq!(args.byte_order, Some(ByteOrderArg::Big));
        assert!(args.overwrite);
        assert!(!args.no_uniqueness_check);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "asdm",
            "validate",
            "dataset",
            "--json",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.verbosity.is_present());
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert!(args.json);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["asdm", "convert", "a", "b", "--format", "fits"]).is_err());
    }
}
