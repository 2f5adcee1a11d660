//! `petshower` - snapshot backup/restore for the petshower scheduling suite
//!
//! This crate serializes an entire store's relational state — clients,
//! pets, appointments, ledger rows, opaque custom tables, and binary
//! attachments — into one portable JSON document, and can later rebuild
//! that state in a different environment. Cross-entity references are
//! rewritten on the way back in so relationships stay internally
//! consistent even though the destination assigns fresh primary keys.
//!
//! # Quick Start
//!
//! ## Building a snapshot
//!
//! ```ignore
//! use petshower::files::FileVault;
//! use petshower::snapshot;
//!
//! let vault = FileVault::new("/var/lib/petshower");
//! let doc = snapshot::build(&engine, &vault)?;
//! let json = doc.to_json()?;
//! ```
//!
//! ## Restoring one
//!
//! ```ignore
//! let report = snapshot::import(&engine, &vault, &json)?;
//! println!("restored {} clients, dropped {} orphan refs",
//!          report.clients, report.dropped_refs);
//! ```
//!
//! # Atomicity
//!
//! Restore holds one write transaction across every relational step and
//! commits or rolls back exactly once. File payloads are staged under a
//! hidden directory and swapped over the live managed sub-path only after
//! the relational commit succeeds, so a failed restore leaves both the
//! store and the filesystem as they were.
//!
//! # Modules
//!
//! - [`snapshot`] - document format, builder, validator, restore
//! - [`files`] - rooted filesystem access and restore staging
//! - [`error`] - crate-level error wrapper

#![deny(clippy::unwrap_used)]

pub mod error;
pub mod files;
pub mod snapshot;

pub use error::{Error, Result};
pub use files::{FileVault, RestoreStage, VaultError};
pub use snapshot::{
    build, import, restore, validate, IdRemap, RestoreReport, SnapshotDocument, SnapshotError,
    SnapshotResult, ValidationError,
};

pub use petshower_core::{
    Attributes, CustomTable, Entity, EntityId, EntityKind, LedgerEntry, LedgerKind, Metadata,
    Row, Value,
};
pub use petshower_store::{StoreEngine, StoreError, StoreResult, StoreTransaction};
