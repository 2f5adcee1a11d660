//! Core store engine traits.
//!
//! This module defines the two traits at the heart of the store layer:
//!
//! - [`StoreEngine`] - the entry point, hands out transactions
//! - [`StoreTransaction`] - typed reads and writes with commit/rollback
//!
//! The interface is deliberately the snapshot engine's view of a store:
//! entities by kind, the optional ledger, flat options, and opaque custom
//! tables. Backends map these onto whatever they actually persist.

use std::sync::Arc;

use petshower_core::{Attributes, CustomTable, Entity, EntityId, EntityKind, LedgerEntry, Metadata, Row, Value};

use super::StoreResult;

/// A store that provides transactional access to the managed data set.
///
/// Implementations must be thread-safe (`Send + Sync`); the snapshot
/// engine itself is single-threaded, but embedding code shares engines
/// across request handlers.
///
/// # Example
///
/// ```ignore
/// use petshower_store::{StoreEngine, StoreTransaction};
///
/// fn example<E: StoreEngine>(engine: &E) -> StoreResult<()> {
///     let tx = engine.begin_read()?;
///     let clients = tx.entities(EntityKind::Client)?;
///
///     let mut tx = engine.begin_write()?;
///     tx.set_option("currency", "EUR".into())?;
///     tx.commit()?;
///     Ok(())
/// }
/// ```
pub trait StoreEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Read transactions see a consistent snapshot of the store; write
    /// operations on them return [`StoreError::ReadOnly`](super::StoreError::ReadOnly).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](super::StoreError::Transaction) if the transaction cannot be
    /// started.
    fn begin_read(&self) -> StoreResult<Self::Transaction<'_>>;

    /// Begin a read-write transaction.
    ///
    /// Writes become visible to other transactions only on
    /// [`StoreTransaction::commit`]. The snapshot engine holds exactly one
    /// write transaction across an entire restore.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](super::StoreError::Transaction) if the transaction cannot be
    /// started.
    fn begin_write(&self) -> StoreResult<Self::Transaction<'_>>;

    /// The store-instance-specific table-name prefix.
    ///
    /// Custom-table snapshots factor this out as a `{prefix}` placeholder
    /// so they restore cleanly under a different prefix.
    fn table_prefix(&self) -> String;
}

/// A transaction over the managed data set.
///
/// Write transactions must be explicitly committed; dropping one without
/// committing discards its changes.
pub trait StoreTransaction {
    // ---- reads -------------------------------------------------------

    /// Read all entities of a kind, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corruption`](super::StoreError::Corruption) if stored data cannot be
    /// interpreted.
    fn entities(&self, kind: EntityKind) -> StoreResult<Vec<Entity>>;

    /// Read all ledger entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`](super::StoreError::TableNotFound) if the ledger table does not
    /// exist — the ledger is provided by an optional collaborator and its
    /// absence is meaningful to callers.
    fn ledger_entries(&self) -> StoreResult<Vec<LedgerEntry>>;

    /// Read all flat option entries, ordered by key.
    fn options(&self) -> StoreResult<Vec<(String, Value)>>;

    /// Read every custom table matching the managed naming convention,
    /// with the instance prefix factored out of name and schema.
    fn custom_tables(&self) -> StoreResult<Vec<CustomTable>>;

    /// Whether a table with the given (fully prefixed) name exists.
    fn has_table(&self, name: &str) -> StoreResult<bool>;

    // ---- writes ------------------------------------------------------

    /// Insert a new entity, returning the id the store assigned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReadOnly`](super::StoreError::ReadOnly) on a read-only transaction.
    fn insert_entity(
        &mut self,
        kind: EntityKind,
        attributes: Attributes,
        metadata: Metadata,
    ) -> StoreResult<EntityId>;

    /// Delete every entity of a kind, returning how many were removed.
    fn delete_entities(&mut self, kind: EntityKind) -> StoreResult<u64>;

    /// Insert a ledger entry. The store assigns the row id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`](super::StoreError::TableNotFound) if the ledger table does not
    /// exist in this store.
    fn insert_ledger_entry(&mut self, entry: &LedgerEntry) -> StoreResult<()>;

    /// Delete every ledger entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`](super::StoreError::TableNotFound) if the ledger table does not
    /// exist.
    fn clear_ledger(&mut self) -> StoreResult<u64>;

    /// Insert or replace a flat option value.
    fn set_option(&mut self, key: &str, value: Value) -> StoreResult<()>;

    /// Create a table with the given (fully prefixed) name and schema DDL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](super::StoreError::Transaction) if the table already exists.
    fn create_table(&mut self, name: &str, schema: &str) -> StoreResult<()>;

    /// Delete every row of a table, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`](super::StoreError::TableNotFound) if the table does not exist.
    fn truncate_table(&mut self, name: &str) -> StoreResult<u64>;

    /// Append a row to a table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`](super::StoreError::TableNotFound) if the table does not exist.
    fn insert_row(&mut self, name: &str, row: Row) -> StoreResult<()>;

    // ---- lifecycle ---------------------------------------------------

    /// Commit the transaction, making all changes visible.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](super::StoreError::Transaction) if the commit fails.
    fn commit(self) -> StoreResult<()>;

    /// Roll back the transaction, discarding all changes.
    ///
    /// Dropping an uncommitted transaction has the same effect; the
    /// explicit form exists for clarity at rollback sites.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](super::StoreError::Transaction) if the rollback fails.
    fn rollback(self) -> StoreResult<()>;

    /// Whether this is a read-only transaction.
    fn is_read_only(&self) -> bool;
}

/// Implement `StoreEngine` for `Arc<E>` to allow shared ownership of
/// engines across components.
impl<E: StoreEngine> StoreEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> StoreResult<Self::Transaction<'_>> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> StoreResult<Self::Transaction<'_>> {
        (**self).begin_write()
    }

    fn table_prefix(&self) -> String {
        (**self).table_prefix()
    }
}
