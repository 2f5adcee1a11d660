//! `petshower-core`
//!
//! Core data types for the petshower snapshot engine.
//!
//! The snapshot engine moves an entire store's state — typed entities with
//! open metadata maps, ledger rows, opaque custom tables — between
//! environments. This crate defines the shared vocabulary for that:
//!
//! - **Identifiers**: [`EntityId`] for referencing entities across records
//! - **Entities**: [`Entity`] with fixed [`Attributes`] plus a metadata map
//! - **Values**: [`Value`] enum for metadata, option, and row values
//! - **References**: [`RefKind`] and [`reference_schema`] declaring which
//!   metadata keys are cross-entity references
//! - **Ledger**: [`LedgerEntry`] financial rows with foreign keys
//! - **Custom tables**: [`CustomTable`] opaque schema-and-rows snapshots
//!
//! # Example
//!
//! ```
//! use petshower_core::{Attributes, Entity, EntityId, EntityKind, Value};
//!
//! let pet = Entity::new(EntityId::new(9), EntityKind::Pet, Attributes::titled("Rex"))
//!     .with_meta("owner_id", 5i64)
//!     .with_meta("breed", "collie");
//!
//! assert_eq!(pet.meta("owner_id").and_then(Value::as_int), Some(5));
//! ```

#![deny(clippy::unwrap_used)]

pub mod types;

pub use types::{
    reference_schema, Attributes, CustomTable, Entity, EntityId, EntityKind, LedgerEntry,
    LedgerKind, Metadata, RefKind, Row, Value,
};
