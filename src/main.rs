use clap::Parser;
use tracing::debug;

use propdesk::adapter::inbound::cli::command::Cli;
use propdesk::adapter::inbound::cli::output::{self, OutputConfig};
use propdesk::adapter::inbound::cli::run;
use propdesk::infrastructure::config::settings::Config;

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.color));

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    config.init_logging();
    debug!(command = ?cli.command, "propdesk starting");

    if let Err(e) = run(&cli, &config) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
