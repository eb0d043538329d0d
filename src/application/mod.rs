//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod auth;
pub mod notification;
pub mod preferences;
pub mod property;
pub mod storage;
pub mod users;

pub use auth::{AuthManager, AuthSettings, MountGuard};
pub use notification::{Announcement, Notifications, SendReport};
pub use preferences::Preferences;
pub use property::PropertyCatalog;
pub use storage::SafeStorage;
pub use users::UserDirectory;
