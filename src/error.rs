use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// How a storage failure is classified for logging.
///
/// Classification never changes facade behavior; every failure marks the
/// backend unavailable the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    /// Quota or disk space exhausted.
    Quota,
    /// Access denied by the host environment (sandbox, permissions).
    Security,
    /// Anything else.
    Generic,
}

impl RestrictionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quota => "quota",
            Self::Security => "security",
            Self::Generic => "generic",
        }
    }
}

/// Failure of a single key/value backend operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("storage access denied: {0}")]
    SecurityDenied(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("probe mismatch: expected {expected:?}, got {actual:?}")]
    Mismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("storage io error: {0}")]
    Io(String),

    #[error("storage database error: {0}")]
    Database(String),

    #[error("storage serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Classify this failure for logging.
    #[must_use]
    pub const fn kind(&self) -> RestrictionKind {
        match self {
            Self::QuotaExceeded(_) => RestrictionKind::Quota,
            Self::SecurityDenied(_) => RestrictionKind::Security,
            _ => RestrictionKind::Generic,
        }
    }

    /// True for quota and security failures.
    #[must_use]
    pub const fn is_restriction(&self) -> bool {
        !matches!(self.kind(), RestrictionKind::Generic)
    }
}

/// Failures reported by the hosted data/auth service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("operation timed out after {millis}ms")]
    Timeout { millis: u64 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restriction_classification() {
        assert_eq!(
            StorageError::QuotaExceeded("full".into()).kind(),
            RestrictionKind::Quota
        );
        assert_eq!(
            StorageError::SecurityDenied("sandbox".into()).kind(),
            RestrictionKind::Security
        );
        assert!(!StorageError::Io("boom".into()).is_restriction());
        assert_eq!(RestrictionKind::Security.as_str(), "security");
    }

    #[test]
    fn service_error_converts_into_error() {
        let err: Error = ServiceError::Timeout { millis: 10 }.into();
        assert_eq!(err.to_string(), "operation timed out after 10ms");
    }
}
