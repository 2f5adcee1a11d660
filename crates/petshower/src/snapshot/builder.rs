//! Snapshot assembly.
//!
//! [`build`] walks the store inside a single read transaction and the
//! file vault, and assembles everything into one [`SnapshotDocument`].
//! The build never mutates anything.

use std::collections::HashSet;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

use petshower_core::{EntityKind, Value};
use petshower_store::{StoreEngine, StoreError, StoreTransaction};

use crate::files::{FileVault, MANAGED_DIR};

use super::document::{
    AttachmentRecord, EntityRecord, FilePayload, LedgerRecord, OptionRecord, SnapshotDocument,
    ATTACHMENT_PATH_KEY, FORMAT_ID, SCHEMA_VERSION,
};
use super::error::{SnapshotError, SnapshotResult};

/// Build a complete snapshot of the store and the managed file tree.
///
/// Entities keep their original ids. An attachment whose
/// [`ATTACHMENT_PATH_KEY`] metadata names an unreadable file aborts the
/// build — a document must never silently claim less than the store
/// holds. A missing ledger table, by contrast, yields an empty
/// `transactions` collection: the ledger belongs to an optional
/// collaborator and its absence on the source side is normal.
///
/// # Errors
///
/// Returns [`SnapshotError::Store`] or [`SnapshotError::Vault`] if
/// reading fails.
pub fn build<E: StoreEngine>(engine: &E, vault: &FileVault) -> SnapshotResult<SnapshotDocument> {
    let tx = engine.begin_read()?;

    let clients = entity_records(&tx, EntityKind::Client)?;
    let pets = entity_records(&tx, EntityKind::Pet)?;
    let appointments = entity_records(&tx, EntityKind::Appointment)?;

    let transactions = match tx.ledger_entries() {
        Ok(entries) => entries.iter().map(LedgerRecord::from_entry).collect(),
        Err(StoreError::TableNotFound(table)) => {
            debug!(%table, "ledger table absent, exporting empty transactions");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    // Attachments carry their payload inline; remember which paths they
    // claim so the loose-file sweep does not capture them twice.
    let mut captured = HashSet::new();
    let mut attachments = Vec::new();
    for entity in tx.entities(EntityKind::Attachment)? {
        let file = match entity.metadata.get(ATTACHMENT_PATH_KEY).and_then(Value::as_str) {
            Some(path) => {
                let content = vault.read(path)?;
                captured.insert(path.to_owned());
                Some(FilePayload { path: path.to_owned(), content })
            }
            None => None,
        };
        attachments.push(AttachmentRecord {
            attributes: entity.attributes,
            metadata: entity.metadata,
            file,
        });
    }

    let mut loose_files = Vec::new();
    for path in vault.list(MANAGED_DIR)? {
        if captured.contains(&path) {
            continue;
        }
        let content = vault.read(&path)?;
        loose_files.push(FilePayload { path, content });
    }

    let custom_tables = tx.custom_tables()?;
    let options = tx
        .options()?
        .into_iter()
        .map(|(key, value)| OptionRecord { key, value })
        .collect();

    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(SnapshotError::serialization)?;

    let document = SnapshotDocument {
        format_id: FORMAT_ID.to_owned(),
        schema_version: SCHEMA_VERSION,
        generated_at,
        clients,
        pets,
        appointments,
        transactions,
        attachments,
        loose_files,
        custom_tables,
        options,
    };

    let stats = document.stats();
    info!(
        clients = stats.clients,
        pets = stats.pets,
        appointments = stats.appointments,
        transactions = stats.transactions,
        attachments = stats.attachments,
        loose_files = stats.loose_files,
        "snapshot built"
    );

    Ok(document)
}

fn entity_records<T: StoreTransaction>(
    tx: &T,
    kind: EntityKind,
) -> SnapshotResult<Vec<EntityRecord>> {
    Ok(tx.entities(kind)?.iter().map(EntityRecord::from_entity).collect())
}
