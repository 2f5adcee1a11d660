//! In-memory store backend.
//!
//! This backend keeps the whole managed data set in process memory. It is
//! the backend embedding code uses in tests and the reference
//! implementation of the transaction contract: a write transaction works
//! on a clone of the store state and swaps it in atomically on commit, so
//! rolling back — or simply dropping the transaction — discards every
//! change at once.
//!
//! # Example
//!
//! ```
//! use petshower_core::{Attributes, EntityKind, Metadata};
//! use petshower_store::backends::MemoryEngine;
//! use petshower_store::{StoreEngine, StoreTransaction};
//!
//! # fn main() -> petshower_store::StoreResult<()> {
//! let engine = MemoryEngine::new();
//!
//! let mut tx = engine.begin_write()?;
//! tx.insert_entity(EntityKind::Pet, Attributes::titled("Rex"), Metadata::new())?;
//! tx.commit()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modeling the optional ledger
//!
//! The ledger table belongs to an optional collaborator. A store created
//! with [`MemoryEngine::without_ledger`] reports
//! `StoreError::TableNotFound` for every ledger operation, which is how
//! the snapshot engine's build/restore asymmetry gets exercised.

mod engine;
mod transaction;

pub use engine::MemoryEngine;
pub use transaction::MemoryTransaction;

use std::collections::BTreeMap;

use petshower_core::{Entity, EntityKind, LedgerEntry, Row, Value};

/// A custom table held in memory: its DDL plus rows.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableState {
    pub(crate) schema: String,
    pub(crate) rows: Vec<Row>,
}

/// The whole store state. Cloned wholesale by write transactions.
#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) next_id: u64,
    pub(crate) next_row_id: u64,
    pub(crate) entities: BTreeMap<EntityKind, BTreeMap<u64, Entity>>,
    /// `None` models an absent ledger table.
    pub(crate) ledger: Option<Vec<LedgerEntry>>,
    pub(crate) options: BTreeMap<String, Value>,
    /// Custom tables keyed by their fully prefixed name.
    pub(crate) tables: BTreeMap<String, TableState>,
}

impl State {
    pub(crate) fn new(with_ledger: bool) -> Self {
        Self {
            next_id: 0,
            next_row_id: 0,
            entities: BTreeMap::new(),
            ledger: with_ledger.then(Vec::new),
            options: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }
}
