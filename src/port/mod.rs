//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │   Domain + Port         │
//!                    └─────────────────────────┘
//!          │                   │                    │
//!          ▼                   ▼                    ▼
//!   ┌────────────┐     ┌──────────────┐     ┌────────────┐
//!   │  Storage   │     │ Data / Auth  │     │  Notifier  │
//!   │  Backends  │     │   Service    │     │  Adapter   │
//!   └────────────┘     └──────────────┘     └────────────┘
//! ```

pub mod outbound;

pub use outbound::auth::{AuthProvider, SessionPersistence};
pub use outbound::data::DataService;
pub use outbound::notifier::Notifier;
pub use outbound::storage::StorageBackend;
