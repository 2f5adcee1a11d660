//! Core data types for the petshower snapshot engine.

mod entity;
mod id;
mod ledger;
mod refs;
mod table;
mod value;

pub use entity::{Attributes, Entity, EntityKind, Metadata};
pub use id::EntityId;
pub use ledger::{LedgerEntry, LedgerKind};
pub use refs::{reference_schema, RefKind};
pub use table::{CustomTable, Row};
pub use value::Value;
