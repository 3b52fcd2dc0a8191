//! Hall Pass Studio CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use hps_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use hps_cli::commands::{run_config, run_roster, run_validate};
use hps_cli::logging::{LogConfig, LogFormat, init_logging};
use hps_cli::settings::load_settings;
use hps_cli::summary::{
    print_config_report, print_limits, print_roster_report, print_validate_report,
};
use hps_sanitize::SystemClock;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match &cli.command {
        Command::Roster(args) => run_roster(args, &settings).map(|report| {
            emit(args.json, &report, || print_roster_report(&report));
            report.has_errors()
        }),
        Command::Validate(args) => run_validate(args, &settings).map(|report| {
            emit(args.json, &report, || print_validate_report(&report));
            report.has_errors()
        }),
        Command::Config(args) => run_config(args).map(|report| {
            emit(args.json, &report, || print_config_report(&report));
            report.has_errors()
        }),
        Command::Limits => {
            print_limits(&settings.rate_limiters(Arc::new(SystemClock)));
            Ok(false)
        }
    };

    match outcome {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Prints `report` as JSON, or through `print_table` for humans.
fn emit<T: Serialize>(json: bool, report: &T, print_table: impl FnOnce()) {
    if !json {
        print_table();
        return;
    }
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{text}"),
        Err(error) => eprintln!("error: failed to serialize report: {error}"),
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
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
