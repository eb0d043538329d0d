//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: key/value storage
//! backends, the hosted data and auth service, and notification delivery.

pub mod auth;
pub mod data;
pub mod notifier;
pub mod storage;
