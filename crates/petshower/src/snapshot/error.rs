//! Error types for snapshot build, validation, and restore.

use thiserror::Error;

use crate::files::VaultError;
use petshower_store::StoreError;

/// Why a candidate document was rejected before any mutation.
///
/// The checks run in a fixed order and short-circuit on the first
/// failure; every failure mode is its own variant so callers can tell a
/// foreign file from a future version from a truncated upload.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The payload is not a JSON object, or decodes into the wrong shape.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The `format_id` tag does not identify a petshower snapshot.
    #[error("not a petshower snapshot (format_id {found:?})")]
    ForeignDocument {
        /// The tag that was found, empty if absent.
        found: String,
    },

    /// The document's schema version is not one this restorer understands.
    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(u64),

    /// A required collection is absent.
    #[error("missing required collection: {0}")]
    MissingCollection(&'static str),

    /// A required collection is present but not a list.
    #[error("collection is not a list: {0}")]
    NotACollection(&'static str),
}

/// Errors that can occur during snapshot build and restore.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document failed validation; the store was not touched.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A store operation failed. During build this aborts the build;
    /// during restore it rolls back the relational transaction.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A filesystem operation failed. During restore the relational
    /// transaction is rolled back and the staged files discarded, so the
    /// live tree is left as it was.
    #[error("filesystem error: {0}")]
    Vault(#[from] VaultError),

    /// The document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SnapshotError {
    /// Create a serialization error from anything displayable.
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
