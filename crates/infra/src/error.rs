//! Store error model and sqlx error mapping.
//!
//! SQLx errors are collapsed into `StoreError::Storage` with the failing
//! operation name attached. Unique-constraint violations are recognized
//! separately so the invoice-number retry path can react to them.

use ledgerly_core::DomainError;
use thiserror::Error;

/// Result type used across the persistence layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A domain rule failed before or during persistence.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The underlying store failed (I/O, constraint, decode).
    #[error("storage failure during {op}: {message}")]
    Storage { op: &'static str, message: String },
}

impl StoreError {
    pub(crate) fn storage(op: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            op,
            message: message.into(),
        }
    }
}

pub(crate) fn map_sqlx_error(op: &'static str, err: sqlx::Error) -> StoreError {
    StoreError::storage(op, err.to_string())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
