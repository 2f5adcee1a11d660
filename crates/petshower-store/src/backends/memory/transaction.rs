//! Transactions over the in-memory engine.

use petshower_core::{
    Attributes, CustomTable, Entity, EntityId, EntityKind, LedgerEntry, Metadata, Row, Value,
};

use crate::engine::{StoreEngine, StoreError, StoreResult, StoreTransaction};

use super::engine::MemoryEngine;
use super::{State, TableState};

/// A transaction over a [`MemoryEngine`].
///
/// Works on a private clone of the store state taken when the transaction
/// began; commit swaps the clone in wholesale. Write transactions are
/// assumed to be externally serialized (the snapshot engine runs one
/// restore at a time), so commit is last-writer-wins by construction.
#[derive(Debug)]
pub struct MemoryTransaction {
    engine: MemoryEngine,
    working: State,
    read_only: bool,
}

impl MemoryTransaction {
    pub(super) fn new(engine: MemoryEngine, read_only: bool) -> StoreResult<Self> {
        let working = engine.snapshot()?;
        Ok(Self { engine, working, read_only })
    }

    fn guard_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }

    fn ledger_name(&self) -> String {
        format!("{}ledger", self.engine.table_prefix())
    }

    fn ledger(&self) -> StoreResult<&Vec<LedgerEntry>> {
        self.working
            .ledger
            .as_ref()
            .ok_or_else(|| StoreError::TableNotFound(self.ledger_name()))
    }

    fn ledger_mut(&mut self) -> StoreResult<&mut Vec<LedgerEntry>> {
        let name = self.ledger_name();
        self.working.ledger.as_mut().ok_or(StoreError::TableNotFound(name))
    }
}

impl StoreTransaction for MemoryTransaction {
    fn entities(&self, kind: EntityKind) -> StoreResult<Vec<Entity>> {
        Ok(self
            .working
            .entities
            .get(&kind)
            .map(|by_id| by_id.values().cloned().collect())
            .unwrap_or_default())
    }

    fn ledger_entries(&self) -> StoreResult<Vec<LedgerEntry>> {
        self.ledger().cloned()
    }

    fn options(&self) -> StoreResult<Vec<(String, Value)>> {
        Ok(self.working.options.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn custom_tables(&self) -> StoreResult<Vec<CustomTable>> {
        let prefix = self.engine.table_prefix();
        Ok(self
            .working
            .tables
            .iter()
            .map(|(name, table)| CustomTable {
                name: name.strip_prefix(&prefix).unwrap_or(name).to_owned(),
                schema: table.schema.replace(&prefix, CustomTable::PREFIX_PLACEHOLDER),
                rows: table.rows.clone(),
            })
            .collect())
    }

    fn has_table(&self, name: &str) -> StoreResult<bool> {
        Ok(self.working.tables.contains_key(name))
    }

    fn insert_entity(
        &mut self,
        kind: EntityKind,
        attributes: Attributes,
        metadata: Metadata,
    ) -> StoreResult<EntityId> {
        self.guard_writable()?;
        self.working.next_id += 1;
        let id = EntityId::new(self.working.next_id);
        let entity = Entity { id, kind, attributes, metadata };
        self.working.entities.entry(kind).or_default().insert(id.as_u64(), entity);
        Ok(id)
    }

    fn delete_entities(&mut self, kind: EntityKind) -> StoreResult<u64> {
        self.guard_writable()?;
        let removed = self
            .working
            .entities
            .remove(&kind)
            .map(|by_id| by_id.len() as u64)
            .unwrap_or(0);
        Ok(removed)
    }

    fn insert_ledger_entry(&mut self, entry: &LedgerEntry) -> StoreResult<()> {
        self.guard_writable()?;
        if self.working.ledger.is_none() {
            return Err(StoreError::TableNotFound(self.ledger_name()));
        }
        self.working.next_row_id += 1;
        let mut entry = entry.clone();
        entry.id = Some(self.working.next_row_id);
        self.ledger_mut()?.push(entry);
        Ok(())
    }

    fn clear_ledger(&mut self) -> StoreResult<u64> {
        self.guard_writable()?;
        let ledger = self.ledger_mut()?;
        let removed = ledger.len() as u64;
        ledger.clear();
        Ok(removed)
    }

    fn set_option(&mut self, key: &str, value: Value) -> StoreResult<()> {
        self.guard_writable()?;
        self.working.options.insert(key.to_owned(), value);
        Ok(())
    }

    fn create_table(&mut self, name: &str, schema: &str) -> StoreResult<()> {
        self.guard_writable()?;
        if self.working.tables.contains_key(name) {
            return Err(StoreError::transaction(format!("table already exists: {name}")));
        }
        self.working
            .tables
            .insert(name.to_owned(), TableState { schema: schema.to_owned(), rows: Vec::new() });
        Ok(())
    }

    fn truncate_table(&mut self, name: &str) -> StoreResult<u64> {
        self.guard_writable()?;
        let table = self
            .working
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_owned()))?;
        let removed = table.rows.len() as u64;
        table.rows.clear();
        Ok(removed)
    }

    fn insert_row(&mut self, name: &str, row: Row) -> StoreResult<()> {
        self.guard_writable()?;
        let table = self
            .working
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_owned()))?;
        table.rows.push(row);
        Ok(())
    }

    fn commit(self) -> StoreResult<()> {
        if self.read_only {
            // Nothing to publish; releasing the snapshot is enough.
            return Ok(());
        }
        self.engine.replace(self.working)
    }

    fn rollback(self) -> StoreResult<()> {
        // Dropping the working clone is the rollback.
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StoreEngine;

    #[test]
    fn insert_assigns_increasing_ids() {
        let engine = MemoryEngine::new();
        let mut tx = engine.begin_write().expect("begin");
        let a = tx
            .insert_entity(EntityKind::Client, Attributes::titled("a"), Metadata::new())
            .expect("insert");
        let b = tx
            .insert_entity(EntityKind::Pet, Attributes::titled("b"), Metadata::new())
            .expect("insert");
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn uncommitted_writes_are_invisible() {
        let engine = MemoryEngine::new();
        {
            let mut tx = engine.begin_write().expect("begin");
            tx.insert_entity(EntityKind::Client, Attributes::titled("a"), Metadata::new())
                .expect("insert");
            // dropped without commit
        }
        let tx = engine.begin_read().expect("begin");
        assert!(tx.entities(EntityKind::Client).expect("read").is_empty());
    }

    #[test]
    fn commit_publishes_writes() {
        let engine = MemoryEngine::new();
        let mut tx = engine.begin_write().expect("begin");
        tx.insert_entity(EntityKind::Client, Attributes::titled("a"), Metadata::new())
            .expect("insert");
        tx.commit().expect("commit");

        let tx = engine.begin_read().expect("begin");
        assert_eq!(tx.entities(EntityKind::Client).expect("read").len(), 1);
    }

    #[test]
    fn read_only_transactions_reject_writes() {
        let engine = MemoryEngine::new();
        let mut tx = engine.begin_read().expect("begin");
        assert!(tx.is_read_only());
        let err = tx
            .insert_entity(EntityKind::Client, Attributes::default(), Metadata::new())
            .expect_err("must reject");
        assert!(matches!(err, StoreError::ReadOnly));
    }

    #[test]
    fn missing_ledger_reports_table_not_found() {
        let engine = MemoryEngine::without_ledger();
        let tx = engine.begin_read().expect("begin");
        assert!(matches!(tx.ledger_entries(), Err(StoreError::TableNotFound(_))));

        let mut tx = engine.begin_write().expect("begin");
        let entry = LedgerEntry::new(10.0, petshower_core::LedgerKind::Income, "paid");
        assert!(matches!(tx.insert_ledger_entry(&entry), Err(StoreError::TableNotFound(_))));
    }

    #[test]
    fn custom_tables_factor_out_prefix() {
        let engine = MemoryEngine::with_prefix("shop_");
        let mut tx = engine.begin_write().expect("begin");
        tx.create_table("shop_reminders", "CREATE TABLE shop_reminders (id INT)")
            .expect("create");
        tx.commit().expect("commit");

        let tx = engine.begin_read().expect("begin");
        let tables = tx.custom_tables().expect("tables");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "reminders");
        assert_eq!(tables[0].schema, "CREATE TABLE {prefix}reminders (id INT)");
    }

    #[test]
    fn truncate_missing_table_fails() {
        let engine = MemoryEngine::new();
        let mut tx = engine.begin_write().expect("begin");
        assert!(matches!(tx.truncate_table("ps_nope"), Err(StoreError::TableNotFound(_))));
    }
}
