//! Store error types.

use std::io;

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A table required by the operation does not exist.
    ///
    /// The snapshot engine treats this differently per direction: during
    /// build a missing ledger table yields an empty collection, while
    /// during restore it is fatal.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The transaction could not be started, committed, or rolled back.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write operation was attempted on a read-only transaction.
    #[error("write attempted on read-only transaction")]
    ReadOnly,

    /// Stored data could not be interpreted.
    #[error("corruption: {0}")]
    Corruption(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Create a transaction error.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Create a corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
