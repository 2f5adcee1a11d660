//! The Snapshot Document wire format.
//!
//! A snapshot is one self-contained JSON object carrying every piece of
//! managed state: entities with their original ids, ledger rows, flat
//! options, opaque custom tables, and base64-encoded file payloads.

use serde::{Deserialize, Serialize};

use petshower_core::{Attributes, CustomTable, Entity, EntityId, LedgerEntry, LedgerKind, Metadata, Value};

use super::error::{SnapshotError, SnapshotResult};

/// The constant tag identifying this subsystem's documents.
pub const FORMAT_ID: &str = "pet-shower-backup";

/// The current document schema version.
pub const SCHEMA_VERSION: u64 = 1;

/// The metadata key on an Attachment entity naming its on-disk file,
/// relative to the storage root.
pub const ATTACHMENT_PATH_KEY: &str = "file_path";

/// The complete, versioned, portable representation of store state.
///
/// Invariant: every entity inside `pets` and `appointments` carries its
/// *original* id, so foreign keys embedded in metadata can be resolved
/// against sibling entities in the same document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Always [`FORMAT_ID`] for documents this engine produces.
    pub format_id: String,
    /// Always [`SCHEMA_VERSION`] for documents this engine produces.
    pub schema_version: u64,
    /// When the snapshot was built, RFC 3339.
    pub generated_at: String,
    /// All client entities.
    pub clients: Vec<EntityRecord>,
    /// All pet entities; metadata may include `owner_id`.
    pub pets: Vec<EntityRecord>,
    /// All appointment entities; metadata may include
    /// `appointment_client_id`, `appointment_pet_id`,
    /// `appointment_pet_ids`.
    pub appointments: Vec<EntityRecord>,
    /// All ledger rows.
    pub transactions: Vec<LedgerRecord>,
    /// Attachment entities with optional file payloads.
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
    /// Files under the managed sub-path with no owning entity.
    #[serde(default)]
    pub loose_files: Vec<FilePayload>,
    /// Opaque custom-table snapshots.
    #[serde(default)]
    pub custom_tables: Vec<CustomTable>,
    /// Flat key-value settings, carried verbatim.
    #[serde(default)]
    pub options: Vec<OptionRecord>,
}

impl SnapshotDocument {
    /// Serialize the document to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> SnapshotResult<String> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::serialization)
    }

    /// Per-collection counts for logging and reports.
    #[must_use]
    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            clients: self.clients.len() as u64,
            pets: self.pets.len() as u64,
            appointments: self.appointments.len() as u64,
            transactions: self.transactions.len() as u64,
            attachments: self.attachments.len() as u64,
            loose_files: self.loose_files.len() as u64,
            custom_tables: self.custom_tables.len() as u64,
            options: self.options.len() as u64,
        }
    }
}

/// Per-collection counts of a document's contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    /// Number of client entities.
    pub clients: u64,
    /// Number of pet entities.
    pub pets: u64,
    /// Number of appointment entities.
    pub appointments: u64,
    /// Number of ledger rows.
    pub transactions: u64,
    /// Number of attachment entities.
    pub attachments: u64,
    /// Number of loose files.
    pub loose_files: u64,
    /// Number of custom tables.
    pub custom_tables: u64,
    /// Number of option entries.
    pub options: u64,
}

/// A serialized entity.
///
/// Same structure as the core [`Entity`] minus the kind, which is implied
/// by the collection the record sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// The entity's id in the *source* store.
    pub id: EntityId,
    /// Fixed scalar fields, carried verbatim.
    pub attributes: Attributes,
    /// Open metadata; reference-bearing keys are rewritten on restore.
    #[serde(default)]
    pub metadata: Metadata,
}

impl EntityRecord {
    /// Create a record from a store entity.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            attributes: entity.attributes.clone(),
            metadata: entity.metadata.clone(),
        }
    }
}

/// A serialized ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// The row id in the source store; dropped on restore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Client foreign key, remapped on restore.
    pub client_ref: Option<EntityId>,
    /// Appointment foreign key, remapped on restore.
    pub appointment_ref: Option<EntityId>,
    /// Monetary amount.
    pub amount: f64,
    /// Income or expense.
    pub kind: LedgerKind,
    /// Business status.
    pub status: String,
    /// Entry date, RFC 3339.
    pub date: String,
}

impl LedgerRecord {
    /// Create a record from a store ledger entry.
    #[must_use]
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id,
            client_ref: entry.client_ref,
            appointment_ref: entry.appointment_ref,
            amount: entry.amount,
            kind: entry.kind,
            status: entry.status.clone(),
            date: entry.entry_date.clone(),
        }
    }

    /// Convert to a store entry with the original row id dropped and the
    /// given (already remapped) foreign keys.
    #[must_use]
    pub fn into_entry(
        &self,
        client_ref: Option<EntityId>,
        appointment_ref: Option<EntityId>,
    ) -> LedgerEntry {
        LedgerEntry {
            id: None,
            client_ref,
            appointment_ref,
            amount: self.amount,
            kind: self.kind,
            status: self.status.clone(),
            entry_date: self.date.clone(),
        }
    }
}

/// An attachment entity plus its optional file payload.
///
/// Attachments are the one record whose persistence spans two resources —
/// the entity store and the filesystem — which is why the payload travels
/// inside the document rather than as a path reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// Fixed scalar fields.
    pub attributes: Attributes,
    /// Open metadata, including [`ATTACHMENT_PATH_KEY`] when a file
    /// payload is present.
    #[serde(default)]
    pub metadata: Metadata,
    /// The file payload, if the attachment has one on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FilePayload>,
}

/// A file carried inside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Path relative to the storage root.
    pub path: String,
    /// The file's bytes, base64-encoded on the wire.
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
}

/// A flat settings entry, carried verbatim (options are process-wide
/// configuration, not entity references — nothing is remapped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Setting name.
    pub key: String,
    /// Setting value.
    pub value: Value,
}

/// Custom serde module for base64-encoded bytes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petshower_core::EntityKind;

    #[test]
    fn entity_record_keeps_original_id() {
        let entity = Entity::new(EntityId::new(9), EntityKind::Pet, Attributes::titled("Rex"))
            .with_meta("owner_id", 5i64);
        let record = EntityRecord::from_entity(&entity);

        assert_eq!(record.id, EntityId::new(9));
        assert_eq!(record.metadata.get("owner_id").and_then(Value::as_int), Some(5));
    }

    #[test]
    fn ledger_restore_entry_drops_row_id() {
        let mut entry = LedgerEntry::new(100.0, LedgerKind::Income, "paid");
        entry.id = Some(44);
        let record = LedgerRecord::from_entry(&entry);
        assert_eq!(record.id, Some(44));

        let restored = record.into_entry(Some(EntityId::new(101)), None);
        assert_eq!(restored.id, None);
        assert_eq!(restored.client_ref, Some(EntityId::new(101)));
    }

    #[test]
    fn file_payload_content_is_base64_on_the_wire() {
        let payload = FilePayload { path: "uploads/rex.jpg".into(), content: b"\x00\x01jpeg".to_vec() };
        let json = serde_json::to_string(&payload).expect("serialize");
        assert!(json.contains("\"AAFqcGVn\""));

        let back: FilePayload = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, payload);
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        let raw = r#"{"path":"uploads/x.bin","content":"not base64!!"}"#;
        assert!(serde_json::from_str::<FilePayload>(raw).is_err());
    }
}
