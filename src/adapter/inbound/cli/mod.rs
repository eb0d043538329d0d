//! CLI module graph.

pub mod command;
pub mod output;
pub mod prefs;
pub mod property;
pub mod report;

use command::{Cli, Commands};

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Dispatch a parsed command line against a loaded configuration.
///
/// # Errors
/// Returns an error when an input file is unreadable or the requested
/// property does not exist. Storage trouble is reported, not returned.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Prefs(command) => prefs::execute(config, command),
        Commands::Report(args) => report::execute(config, args),
        Commands::Property(args) => property::execute(config, args),
    }
}
