//! CLI argument definitions for the `hps` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hps",
    version,
    about = "Hall Pass Studio - roster import checks and form validation",
    long_about = "Check roster spreadsheets and dashboard form payloads before they reach the school database.\n\n\
                  Maps roster columns (English or Spanish headers), flags duplicate students,\n\
                  and validates passes, log entries, broadcasts and other records."
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

    /// Allow student names and IDs to appear in debug logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: ./hps.toml if present).
    #[arg(long = "config", value_name = "TOML", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Map a roster CSV's columns and report duplicate students.
    Roster(RosterArgs),

    /// Validate dashboard records from a JSON file.
    Validate(ValidateArgs),

    /// Validate a configuration section from a JSON file.
    Config(ConfigArgs),

    /// List the configured rate limits.
    Limits,
}

#[derive(Parser)]
pub struct RosterArgs {
    /// Roster spreadsheet exported as CSV (first row is the header).
    #[arg(value_name = "CSV")]
    pub roster: PathBuf,

    /// Current roster to check for duplicates against.
    #[arg(long = "existing", value_name = "CSV")]
    pub existing: Option<PathBuf>,

    /// Minimum header confidence to accept a column (overrides settings).
    #[arg(long = "min-confidence", value_name = "F")]
    pub min_confidence: Option<f64>,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Kind of record in the file.
    #[arg(value_enum, value_name = "ENTITY")]
    pub entity: EntityArg,

    /// JSON file holding one record or an array of records.
    #[arg(value_name = "JSON_FILE")]
    pub input: PathBuf,

    /// Print results as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Push every record through the entity's rate limiter, as one burst.
    #[arg(long = "enforce-limits")]
    pub enforce_limits: bool,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Section name (labels or economy).
    #[arg(value_name = "SECTION")]
    pub section: String,

    /// JSON file holding the section object.
    #[arg(value_name = "JSON_FILE")]
    pub input: PathBuf,

    /// Print the result as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// Record kinds accepted by `hps validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Pass,
    LogEntry,
    Broadcast,
    ConflictGroup,
    ParentContact,
    School,
}

impl EntityArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::LogEntry => "log-entry",
            Self::Broadcast => "broadcast",
            Self::ConflictGroup => "conflict-group",
            Self::ParentContact => "parent-contact",
            Self::School => "school",
        }
    }
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
