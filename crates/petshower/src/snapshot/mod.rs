//! Snapshot build, validation, and restore.
//!
//! This module is the heart of the crate: it assembles a complete
//! [`SnapshotDocument`] from a live store, gatekeeps candidate documents
//! before any destructive action, and rebuilds store state from a
//! validated document with all-or-nothing semantics over the relational
//! portion.
//!
//! # Document format
//!
//! A snapshot is a single JSON object tagged with
//! [`FORMAT_ID`](document::FORMAT_ID) and a flat
//! [`SCHEMA_VERSION`](document::SCHEMA_VERSION). Entities keep their
//! *original* ids inside the document so foreign keys embedded in sibling
//! metadata can be resolved during restore; the destination assigns fresh
//! ids and the [`IdRemap`] table keeps references consistent.
//!
//! # Control flow
//!
//! ```text
//! build() ──> SnapshotDocument ──(transport)──> validate() ──> restore()
//! ```
//!
//! [`import`] is the convenience composition of the last two steps.

mod builder;
mod document;
mod error;
mod remap;
mod restore;
mod validate;

pub use builder::build;
pub use document::{
    AttachmentRecord, EntityRecord, FilePayload, LedgerRecord, OptionRecord, SnapshotDocument,
    SnapshotStats, ATTACHMENT_PATH_KEY, FORMAT_ID, SCHEMA_VERSION,
};
pub use error::{SnapshotError, SnapshotResult, ValidationError};
pub use remap::{rewrite_metadata, IdRemap};
pub use restore::{restore, RestoreReport};
pub use validate::validate;

use petshower_store::StoreEngine;

use crate::files::FileVault;

/// Validate a raw document and restore it in one call.
///
/// This is the import entry point's core: authorization and anti-replay
/// checks happen in the caller, before the raw payload reaches this
/// function. Validation never touches the store, so a rejected document
/// leaves the destination byte-for-byte unchanged.
///
/// # Errors
///
/// Returns [`SnapshotError::Validation`] for a rejected document, or any
/// error [`restore`] can produce.
pub fn import<E: StoreEngine>(
    engine: &E,
    vault: &FileVault,
    raw: &str,
) -> SnapshotResult<RestoreReport> {
    let doc = validate(raw)?;
    restore(engine, vault, &doc)
}
