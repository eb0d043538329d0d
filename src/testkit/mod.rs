//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`storage`]: `ScriptedBackend` with injectable failures and call counters.
//! - [`service`]: in-memory data service, auth provider and notifier.
//! - [`domain`]: builders for property and profile records.
//! - [`config`]: canonical test configurations.

pub mod config;
pub mod domain;
pub mod service;
pub mod storage;
