//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the available delivery backends.

pub mod log;

pub use log::LogNotifier;
