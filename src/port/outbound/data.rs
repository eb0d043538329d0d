//! Row-level data access port for the hosted store.
//!
//! The store speaks JSON documents; typed conversion happens in the
//! application services.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;

/// Tables the application reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Properties,
    Profiles,
}

impl Table {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Profiles => "profiles",
        }
    }
}

/// Equality filter: every `(column, value)` pair must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub equals: Vec<(String, Value)>,
}

impl Filter {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push((column.into(), value.into()));
        self
    }

    /// Whether `row` satisfies every clause.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.equals
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Result ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl Order {
    #[must_use]
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Descending,
        }
    }

    #[must_use]
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Ascending,
        }
    }
}

/// CRUD capability set of the hosted data service.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn select_all(
        &self,
        table: Table,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Vec<Value>, ServiceError>;

    async fn select_one(&self, table: Table, id: &str) -> Result<Option<Value>, ServiceError>;

    /// Insert a row; returns the stored row.
    async fn insert(&self, table: Table, row: Value) -> Result<Option<Value>, ServiceError>;

    /// Merge `patch` into the row; returns the updated row.
    async fn update(&self, table: Table, id: &str, patch: Value)
        -> Result<Option<Value>, ServiceError>;

    /// Returns true if a row was deleted.
    async fn delete(&self, table: Table, id: &str) -> Result<bool, ServiceError>;
}
