//! CLI argument definitions for the mission host.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mission",
    version,
    about = "Mission stage engine - play the escape-room stages in a terminal",
    long_about = "Play the staged escape-room mission from a terminal.\n\n\
                  Each stage opens with a short narrative and ends with a puzzle:\n\
                  free-text answers, QR coordinate sets, coordinate codes and a\n\
                  word bingo board."
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

    /// Settings file (default: settings.toml in the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Alternate stage catalog TOML instead of the built-in stages.
    #[arg(long = "catalog", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Play the mission interactively.
    Play(PlayArgs),

    /// List the stages of the catalog.
    Stages,

    /// Resolve the preview for a scanned URL and print it as JSON.
    Preview(PreviewArgs),
}

#[derive(Parser)]
pub struct PlayArgs {
    /// Stage to start at.
    #[arg(long = "stage", value_name = "N")]
    pub stage: Option<u32>,

    /// Keep intro positions in this JSON file across runs.
    #[arg(long = "session", value_name = "PATH")]
    pub session: Option<PathBuf>,

    /// Disallow going back to the previous stage.
    #[arg(long = "no-retreat")]
    pub no_retreat: bool,
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Scanned value to resolve.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Ask a deployed preview endpoint instead of resolving in-process.
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,
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
