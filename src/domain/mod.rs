//! Core domain types and pure business logic.
//!
//! Nothing in this module performs I/O. Property records come in from the
//! data service, and everything shown about them is derived here.

pub mod error;
pub mod financial;
pub mod id;
pub mod listing;
pub mod locale;
pub mod money;
pub mod portfolio;
pub mod property;
pub mod user;

pub use financial::{FinancialSummary, Financials, Margin};
pub use id::{PropertyId, UserId};
pub use locale::Language;
pub use money::Amount;
pub use portfolio::{InventorySummary, PortfolioSummary};
pub use property::{ListingType, Property, PropertyStatus, PropertyType};
pub use user::{Role, User, UserProfile};
