//! The restore orchestrator.
//!
//! Restore is destructive by definition: it wipes the managed data set
//! and rebuilds it from a validated document. All relational work happens
//! inside one write transaction, and all file payloads go to a staging
//! directory, so a failure anywhere leaves both the store and the live
//! file tree as they were.

use serde::Serialize;
use tracing::{info, warn};

use petshower_core::{Attributes, EntityId, EntityKind, Metadata};
use petshower_store::{StoreEngine, StoreError, StoreTransaction};

use crate::files::{FileVault, RestoreStage};

use super::document::SnapshotDocument;
use super::error::SnapshotResult;
use super::remap::{rewrite_metadata, IdRemap};

/// What a successful restore did, by the numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    /// Client entities inserted.
    pub clients: u64,
    /// Pet entities inserted.
    pub pets: u64,
    /// Appointment entities inserted.
    pub appointments: u64,
    /// Ledger rows inserted.
    pub ledger_entries: u64,
    /// Option entries written.
    pub options: u64,
    /// Custom tables restored.
    pub custom_tables: u64,
    /// Attachment entities inserted.
    pub attachments: u64,
    /// Loose files written.
    pub loose_files: u64,
    /// References that pointed at entities absent from the document and
    /// were dropped during rewriting.
    pub dropped_refs: u64,
}

/// Replace the managed data set with the contents of a validated
/// document.
///
/// The sequence is wipe, insert in dependency order (clients, then pets,
/// then appointments), rewrite references through the id remap table,
/// then commit. File payloads are staged alongside and the managed
/// directory is swapped over the live one only after the relational
/// commit succeeds.
///
/// # Errors
///
/// Any error rolls back the transaction and discards the staged files;
/// the destination is left unchanged. A missing ledger table is fatal
/// here (unlike during build): the document carries rows the destination
/// cannot hold, and dropping them silently would falsify the restore.
pub fn restore<E: StoreEngine>(
    engine: &E,
    vault: &FileVault,
    document: &SnapshotDocument,
) -> SnapshotResult<RestoreReport> {
    let mut tx = engine.begin_write()?;
    let mut stage = vault.stage()?;
    let prefix = engine.table_prefix();

    let report = match run(&mut tx, &mut stage, &prefix, document) {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "restore failed, rolling back");
            stage.discard();
            if let Err(rb) = tx.rollback() {
                warn!(error = %rb, "rollback failed");
            }
            return Err(e);
        }
    };

    if let Err(e) = tx.commit() {
        stage.discard();
        return Err(e.into());
    }
    // The store now holds the restored state; promoting the staged files
    // is the only remaining step, and its own failure cannot undo the
    // commit. See DESIGN.md on this residual window.
    stage.promote()?;

    if report.dropped_refs > 0 {
        warn!(dropped = report.dropped_refs, "dropped references to entities absent from the document");
    }
    info!(
        clients = report.clients,
        pets = report.pets,
        appointments = report.appointments,
        ledger_entries = report.ledger_entries,
        attachments = report.attachments,
        loose_files = report.loose_files,
        "restore committed"
    );
    Ok(report)
}

/// The fallible body of a restore; the caller owns rollback and staging
/// cleanup.
fn run<T: StoreTransaction>(
    tx: &mut T,
    stage: &mut RestoreStage,
    prefix: &str,
    document: &SnapshotDocument,
) -> SnapshotResult<RestoreReport> {
    wipe(tx, prefix)?;

    let mut remap = IdRemap::new();
    let mut report = RestoreReport::default();

    for record in &document.clients {
        let new = insert(tx, EntityKind::Client, record.attributes.clone(), record.metadata.clone())?;
        remap.record(EntityKind::Client, record.id, new);
        report.clients += 1;
    }

    for record in &document.pets {
        let mut metadata = record.metadata.clone();
        rewrite_metadata(EntityKind::Pet, &mut metadata, &mut remap);
        let new = insert(tx, EntityKind::Pet, record.attributes.clone(), metadata)?;
        remap.record(EntityKind::Pet, record.id, new);
        report.pets += 1;
    }

    for record in &document.appointments {
        let mut metadata = record.metadata.clone();
        rewrite_metadata(EntityKind::Appointment, &mut metadata, &mut remap);
        let new = insert(tx, EntityKind::Appointment, record.attributes.clone(), metadata)?;
        remap.record(EntityKind::Appointment, record.id, new);
        report.appointments += 1;
    }

    for record in &document.transactions {
        let client_ref = resolve_ref(&remap, EntityKind::Client, record.client_ref, &mut report);
        let appointment_ref =
            resolve_ref(&remap, EntityKind::Appointment, record.appointment_ref, &mut report);
        tx.insert_ledger_entry(&record.into_entry(client_ref, appointment_ref))?;
        report.ledger_entries += 1;
    }

    for option in &document.options {
        tx.set_option(&option.key, option.value.clone())?;
        report.options += 1;
    }

    for table in &document.custom_tables {
        let name = table.qualified_name(prefix);
        if tx.has_table(&name)? {
            tx.truncate_table(&name)?;
        } else {
            tx.create_table(&name, &table.schema_for(prefix))?;
        }
        for row in &table.rows {
            tx.insert_row(&name, row.clone())?;
        }
        report.custom_tables += 1;
    }

    for record in &document.attachments {
        insert(tx, EntityKind::Attachment, record.attributes.clone(), record.metadata.clone())?;
        if let Some(file) = &record.file {
            stage.write(&file.path, &file.content)?;
        }
        report.attachments += 1;
    }

    for file in &document.loose_files {
        stage.write(&file.path, &file.content)?;
        report.loose_files += 1;
    }

    report.dropped_refs += remap.dropped();
    Ok(report)
}

/// Clear everything a restore replaces.
///
/// A missing ledger table is tolerated here: there is nothing to clear.
/// It only becomes an error later, if the document actually carries rows.
fn wipe<T: StoreTransaction>(tx: &mut T, prefix: &str) -> SnapshotResult<()> {
    for kind in EntityKind::ALL {
        tx.delete_entities(kind)?;
    }
    match tx.clear_ledger() {
        Ok(_) | Err(StoreError::TableNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }
    for table in tx.custom_tables()? {
        tx.truncate_table(&table.qualified_name(prefix))?;
    }
    Ok(())
}

fn insert<T: StoreTransaction>(
    tx: &mut T,
    kind: EntityKind,
    attributes: Attributes,
    metadata: Metadata,
) -> SnapshotResult<EntityId> {
    Ok(tx.insert_entity(kind, attributes, metadata)?)
}

/// Resolve a ledger foreign key; an unresolvable one is dropped and
/// counted, the row itself is kept.
fn resolve_ref(
    remap: &IdRemap,
    kind: EntityKind,
    old: Option<EntityId>,
    report: &mut RestoreReport,
) -> Option<EntityId> {
    let old = old?;
    match remap.resolve(kind, old) {
        Some(new) => Some(new),
        None => {
            report.dropped_refs += 1;
            None
        }
    }
}
