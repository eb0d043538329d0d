//! Preference cache with graceful degradation.

mod safe;
pub mod session;
mod status;

pub use safe::{ReprobePolicy, SafeStorage, StorageOptions};
pub use session::SessionStore;
pub use status::{Availability, BackendStatus, StorageStatus};
