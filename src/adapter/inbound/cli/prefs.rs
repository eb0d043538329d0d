//! Preference storage maintenance.
//!
//! Every subcommand runs against the configured backends. A backend that
//! is down is reported, never fatal: writes still land in memory for the
//! rest of the run.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::PrefsCommand;
use crate::adapter::inbound::cli::output;
use crate::application::storage::{Availability, SafeStorage, StorageStatus};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::storage::Durability;

#[derive(Tabled)]
struct BackendRow {
    #[tabled(rename = "Backend")]
    name: String,
    #[tabled(rename = "Durability")]
    durability: &'static str,
    #[tabled(rename = "State")]
    state: String,
}

impl BackendRow {
    fn from_status(status: &StorageStatus) -> Vec<Self> {
        status
            .backends
            .iter()
            .map(|backend| Self {
                name: backend.name.clone(),
                durability: match backend.durability {
                    Durability::Durable => "durable",
                    Durability::Volatile => "volatile",
                },
                state: match &backend.availability {
                    Availability::Unknown => "unknown".to_string(),
                    Availability::Available => "available".to_string(),
                    Availability::Unavailable { reason } => format!("unavailable: {reason}"),
                },
            })
            .collect()
    }
}

/// Execute a `prefs` subcommand.
pub fn execute(config: &Config, command: &PrefsCommand) -> Result<()> {
    let storage = bootstrap::build_storage(config);
    match command {
        PrefsCommand::Get { key, default } => get(&storage, key, default),
        PrefsCommand::Set { key, value } => set(&storage, key, value),
        PrefsCommand::Remove { key } => remove(&storage, key),
        PrefsCommand::Status => status(&storage),
    }
    Ok(())
}

fn get(storage: &SafeStorage, key: &str, default: &str) {
    let value = storage.get(key, default);
    if output::is_json() {
        output::json_output(json!({
            "command": "prefs.get",
            "key": key,
            "value": value,
        }));
        return;
    }
    output::value(value);
}

fn set(storage: &SafeStorage, key: &str, value: &str) {
    let durable = storage.set(key, value);
    if output::is_json() {
        output::json_output(json!({
            "command": "prefs.set",
            "key": key,
            "value": value,
            "durable": durable,
        }));
        return;
    }

    if durable {
        output::success(&format!("Saved {}", output::highlight(key)));
    } else {
        output::warning(&format!(
            "Saved {} for this run only; no durable storage is available",
            output::highlight(key)
        ));
    }
}

fn remove(storage: &SafeStorage, key: &str) {
    let removed = storage.remove(key);
    if output::is_json() {
        output::json_output(json!({
            "command": "prefs.remove",
            "key": key,
            "removed": removed,
        }));
        return;
    }

    if removed {
        output::success(&format!("Removed {}", output::highlight(key)));
    } else {
        output::warning(&format!(
            "Removed {} from memory only; no backend confirmed the delete",
            output::highlight(key)
        ));
    }
}

fn status(storage: &SafeStorage) {
    storage.probe_all();
    let status = storage.status();

    if output::is_json() {
        output::json_output(json!({
            "command": "prefs.status",
            "memoryOnly": status.is_memory_only(),
            "status": status,
        }));
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Preference storage");

    if status.backends.is_empty() {
        output::note("No backends configured");
    } else {
        output::lines(&Table::new(BackendRow::from_status(&status)).to_string());
    }

    if status.is_memory_only() {
        output::warning("Running in memory-only mode; preferences last until exit");
    } else {
        output::success("Durable storage available");
    }
}
