//! Mission CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use mission_cli::commands::{PlayOptions, load_stages, preview_source, run_play, run_preview, run_stages};
use mission_cli::config::load_settings;
use mission_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

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

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref());
    match &cli.command {
        Command::Play(args) => {
            let catalog = load_stages(cli.catalog.as_deref())?;
            let options = PlayOptions {
                stage: args.stage,
                session: args.session.as_deref(),
                no_retreat: args.no_retreat,
            };
            run_play(catalog, &settings, &options)
        }
        Command::Stages => {
            let catalog = load_stages(cli.catalog.as_deref())?;
            run_stages(&catalog)
        }
        Command::Preview(args) => {
            let source = preview_source(&settings, args.endpoint.as_deref())?;
            let reply = run_preview(source.as_ref(), &args.url);
            println!("{}", reply.body());
            Ok(())
        }
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
