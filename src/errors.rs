use std::fmt;

use thiserror::Error;

/// Rejected input. Always surfaced to the caller, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("category cannot be empty or contain only invalid characters")]
    EmptyCategory,
    #[error("amount cannot be 0")]
    ZeroAmount,
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("date cannot be empty")]
    MissingDate,
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("start date must be between 1 and 31, got {0}")]
    StartDateOutOfRange(u32),
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("id `{0}` is already in use")]
    DuplicateId(String),
    #[error("transaction id counter is exhausted")]
    CounterExhausted,
    #[error("occurrence count {requested} exceeds the limit of {limit}")]
    TooManyOccurrences { requested: u32, limit: u32 },
}

/// Which kind of record a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Transaction,
    RecurringTemplate,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entity::Transaction => "expense",
            Entity::RecurringTemplate => "recurring expense",
        };
        f.write_str(label)
    }
}

/// Error type shared by both storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: Entity, id: String },
    #[error("{operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{operation}: {source}")]
    Serde {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn io(operation: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| StoreError::Io { operation, source }
    }

    pub fn serde(operation: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| StoreError::Serde { operation, source }
    }

    pub fn db(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Database { operation, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Disk, serialization, or database failures. Callers map these to 5xx.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            StoreError::Io { .. } | StoreError::Serde { .. } | StoreError::Database { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
