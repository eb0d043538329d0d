//! Domain validation errors for property records.
//!
//! These errors are returned by `validate` and by state transitions such as
//! [`Property::mark_as_sold`](crate::domain::property::Property::mark_as_sold)
//! when a record would violate a domain rule.
//!
//! # Examples
//!
//! ```
//! use propdesk::domain::error::DomainError;
//! use rust_decimal_macros::dec;
//!
//! let err = DomainError::NonPositiveSoldPrice { price: dec!(0) };
//! assert_eq!(err.to_string(), "sold price must be positive, got 0");
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field is empty.
    #[error("{field} is required")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Monetary values stored on a property must not be negative.
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid amount.
        amount: rust_decimal::Decimal,
    },

    /// A sale must be recorded with a positive price.
    #[error("sold price must be positive, got {price}")]
    NonPositiveSoldPrice {
        /// The invalid sold price.
        price: rust_decimal::Decimal,
    },

    /// Unrecognized language code.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Unrecognized user role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
