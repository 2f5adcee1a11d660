//! Crate-level convenience error.
//!
//! Not a god error: a thin wrapper over the capability errors, so callers
//! that don't care which subsystem failed can hold one type.

use thiserror::Error;

use crate::files::VaultError;
use crate::snapshot::{SnapshotError, ValidationError};
use petshower_store::StoreError;

/// Crate-level error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;
