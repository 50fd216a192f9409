//! Storage error taxonomy.
//!
//! Every fallible storage operation returns [`StoreResult`]. The error
//! enum is closed: callers can match on it (or on [`ErrorKind`]) to map
//! storage failures to their own error types without string inspection.

use crate::entity::Entity;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {detail}")]
    DuplicatedEntry { entity: &'static str, detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid paging: {0}")]
    InvalidPaging(String),

    #[error("transaction already in progress")]
    TransactionInProgress,

    #[error("no active transaction")]
    NoActiveTransaction,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Discriminant-only view of [`StoreError`], convenient for mapping
/// to HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DuplicatedEntry,
    InvalidInput,
    InvalidPaging,
    TransactionInProgress,
    NoActiveTransaction,
    Backend,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicatedEntry { .. } => ErrorKind::DuplicatedEntry,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InvalidPaging(_) => ErrorKind::InvalidPaging,
            Self::TransactionInProgress => ErrorKind::TransactionInProgress,
            Self::NoActiveTransaction => ErrorKind::NoActiveTransaction,
            Self::Backend(_) => ErrorKind::Backend,
        }
    }

    pub fn not_found<E: Entity>(id: E::Key) -> Self {
        Self::NotFound {
            entity: E::NAME,
            id: id.to_string(),
        }
    }

    /// NotFound raised by predicate queries, which have no id to report.
    pub fn no_match<E: Entity>() -> Self {
        Self::NotFound {
            entity: E::NAME,
            id: "<predicate>".to_string(),
        }
    }

    pub fn duplicated<E: Entity>(detail: impl Into<String>) -> Self {
        Self::DuplicatedEntry {
            entity: E::NAME,
            detail: detail.into(),
        }
    }
}
