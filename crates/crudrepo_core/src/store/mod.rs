//! Persistence collaborator contracts.
//!
//! # Responsibility
//! - Define the primitive operations a repository delegates to
//!   (`save`, `find_by_key`, `find_many`, `delete_by_key`).
//! - Provide the SQLite-backed store and the record-mapping adapter.
//!
//! # Invariants
//! - Stores report failures as `StoreError`; they never interpret them.
//! - `save` is an upsert keyed by the entity primary key.
//! - `delete_by_key` reports the affected row count instead of failing on
//!   missing keys.

use crate::db::DbError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod mapped;
pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store primitive.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Row or record cannot be converted to/from its persisted shape.
    InvalidData(String),
    /// Table or field name is not a plain SQL identifier.
    InvalidIdentifier(String),
    MissingRequiredTable(String),
    MissingRequiredColumn {
        table: String,
        column: &'static str,
    },
    /// A previous holder of the shared connection panicked.
    ConnectionPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid record data: {message}"),
            Self::InvalidIdentifier(value) => write!(f, "invalid sql identifier `{value}`"),
            Self::MissingRequiredTable(table) => write!(f, "store requires table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "store requires column `{column}` in table `{table}`")
            }
            Self::ConnectionPoisoned => write!(f, "shared connection lock is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Sort direction for `find_many`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordering applied by `find_many`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Filter options accepted by `find`.
///
/// All fields are optional; the default returns every record in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Number of records to skip.
    #[serde(default)]
    pub skip: Option<u32>,
    /// Maximum number of records to return.
    #[serde(default)]
    pub take: Option<u32>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
}

impl FindOptions {
    /// Offset/limit page, the legacy positional `(skip, limit)` call shape.
    pub fn page(skip: u32, limit: u32) -> Self {
        Self {
            skip: Some(skip),
            take: Some(limit),
            order_by: None,
        }
    }

    pub fn ordered_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }
}

/// Result of a delete-by-key primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Number of records actually removed.
    pub affected: usize,
}

/// Persistence primitives for one entity type bound to one table.
pub trait Store<T> {
    /// Inserts or replaces `record` by primary key and returns the persisted
    /// value, including any store-populated defaults.
    fn save(&self, record: &T) -> StoreResult<T>;
    fn find_by_key(&self, id: &str) -> StoreResult<Option<T>>;
    fn find_many(&self, options: &FindOptions) -> StoreResult<Vec<T>>;
    fn delete_by_key(&self, id: &str) -> StoreResult<DeleteOutcome>;
}

impl<T, S: Store<T> + ?Sized> Store<T> for Arc<S> {
    fn save(&self, record: &T) -> StoreResult<T> {
        (**self).save(record)
    }

    fn find_by_key(&self, id: &str) -> StoreResult<Option<T>> {
        (**self).find_by_key(id)
    }

    fn find_many(&self, options: &FindOptions) -> StoreResult<Vec<T>> {
        (**self).find_many(options)
    }

    fn delete_by_key(&self, id: &str) -> StoreResult<DeleteOutcome> {
        (**self).delete_by_key(id)
    }
}
