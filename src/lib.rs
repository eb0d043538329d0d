//! Propdesk - property listings, resilient preference storage and
//! portfolio finance for a bilingual real-estate app.
//!
//! # Architecture
//!
//! The crate is laid out hexagonally:
//!
//! - **`domain`** - Listings, users, money and the derived financial figures
//! - **`port`** - Traits for storage backends, the hosted data and auth
//!   services, and notification delivery
//! - **`application`** - Use cases: the degrading preference cache, the
//!   property catalog, session handling, the user directory and
//!   announcements
//! - **`adapter`** - SQLite, JSON-file and in-memory storage backends, a
//!   logging notifier, and the `propdesk` CLI
//! - **`infrastructure`** - Configuration, data paths and wiring
//!
//! # Features
//!
//! - `testkit` - Scripted backends and in-memory services for tests
//!
//! # Example
//!
//! ```
//! use propdesk::application::SafeStorage;
//!
//! let storage = SafeStorage::memory_only();
//! assert!(!storage.set("language", "en"));
//! assert_eq!(storage.get("language", "pt"), "en");
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
