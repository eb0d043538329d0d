//! Command-line interface definitions.
//!
//! Defines the CLI structure for the propdesk binary using `clap`: preference
//! storage maintenance plus financial reports over exported listing files.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Language;

/// Property desk preferences and portfolio reports
#[derive(Parser, Debug)]
#[command(name = "propdesk")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: ~/.propdesk/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the propdesk CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read and write stored preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// Portfolio and inventory summary for a listings file
    Report(ReportArgs),

    /// Financial summary for one property in a listings file
    Property(PropertyArgs),
}

/// Subcommands for `propdesk prefs`.
#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print the stored value for a key.
    Get {
        key: String,
        /// Value printed when the key is set nowhere.
        #[arg(long, default_value = "")]
        default: String,
    },
    /// Store a value.
    Set { key: String, value: String },
    /// Delete a key from every backend.
    Remove { key: String },
    /// Show backend availability.
    Status,
}

/// Arguments for the `report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// JSON array of property records.
    pub file: PathBuf,

    /// Report language (pt, en) [default: stored preference]
    #[arg(long)]
    pub lang: Option<Language>,
}

/// Arguments for the `property` subcommand.
#[derive(Parser, Debug)]
pub struct PropertyArgs {
    /// JSON array of property records.
    pub file: PathBuf,

    /// Id of the property to summarize.
    pub id: String,

    /// Report language (pt, en) [default: stored preference]
    #[arg(long)]
    pub lang: Option<Language>,
}
