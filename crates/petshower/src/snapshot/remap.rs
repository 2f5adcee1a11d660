//! The identifier remap table and metadata rewriting.
//!
//! The destination store assigns fresh ids on insert, so every reference
//! recorded against a source id must be rewritten before it lands. The
//! [`IdRemap`] table accumulates `old → new` pairs as entities are
//! inserted, and [`rewrite_metadata`] walks an entity's reference schema
//! against it.
//!
//! The table lives for exactly one restore invocation and is passed
//! explicitly through the restore steps — it is never persisted and never
//! shared across restores.

use std::collections::HashMap;

use petshower_core::{reference_schema, EntityId, EntityKind, Metadata, RefKind, Value};

/// Per-entity-kind map from original id to the id assigned during
/// restore.
#[derive(Debug, Default)]
pub struct IdRemap {
    maps: HashMap<EntityKind, HashMap<u64, EntityId>>,
    dropped: u64,
}

impl IdRemap {
    /// Create an empty remap table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old` in the source store became `new` here.
    pub fn record(&mut self, kind: EntityKind, old: EntityId, new: EntityId) {
        self.maps.entry(kind).or_default().insert(old.as_u64(), new);
    }

    /// Resolve an original id to its restored counterpart.
    #[must_use]
    pub fn resolve(&self, kind: EntityKind, old: EntityId) -> Option<EntityId> {
        self.maps.get(&kind).and_then(|m| m.get(&old.as_u64())).copied()
    }

    /// Count orphan references that were dropped during rewriting.
    pub fn note_dropped(&mut self, count: u64) {
        self.dropped += count;
    }

    /// Total orphan references dropped so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// How many entities of a kind have been recorded.
    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.maps.get(&kind).map_or(0, HashMap::len)
    }
}

/// Rewrite the reference-bearing metadata keys of an entity of `kind`.
///
/// Single references whose target is absent from the table are removed
/// from the map (orphans are dropped, not errors); list references keep
/// only resolvable elements, and a list emptied this way is stored empty
/// rather than omitted. Every drop is counted on the table.
pub fn rewrite_metadata(kind: EntityKind, metadata: &mut Metadata, remap: &mut IdRemap) {
    for (key, ref_kind) in reference_schema(kind) {
        match ref_kind {
            RefKind::EntityRef(target) => {
                let Some(value) = metadata.get(*key) else { continue };
                match resolve_value(value, *target, remap) {
                    Some(new) => {
                        metadata.insert((*key).to_owned(), new);
                    }
                    None => {
                        metadata.remove(*key);
                        remap.note_dropped(1);
                    }
                }
            }
            RefKind::EntityRefList(target) => {
                let Some(value) = metadata.get(*key) else { continue };
                let items = value.as_array().unwrap_or_default();
                let mut kept = Vec::with_capacity(items.len());
                for item in items {
                    match resolve_value(item, *target, remap) {
                        Some(new) => kept.push(new),
                        None => remap.note_dropped(1),
                    }
                }
                metadata.insert((*key).to_owned(), Value::Array(kept));
            }
            RefKind::Scalar | RefKind::Opaque => {}
        }
    }
}

/// Resolve one reference value against the table. Non-integer and
/// negative values cannot name an entity and resolve to nothing.
fn resolve_value(value: &Value, target: EntityKind, remap: &IdRemap) -> Option<Value> {
    let old = value.as_int().and_then(|i| u64::try_from(i).ok())?;
    let new = remap.resolve(target, EntityId::new(old))?;
    i64::try_from(new.as_u64()).ok().map(Value::Int)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, Value)]) -> Metadata {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
    }

    #[test]
    fn record_and_resolve() {
        let mut remap = IdRemap::new();
        remap.record(EntityKind::Client, EntityId::new(5), EntityId::new(101));

        assert_eq!(
            remap.resolve(EntityKind::Client, EntityId::new(5)),
            Some(EntityId::new(101))
        );
        // Kinds are separate namespaces.
        assert_eq!(remap.resolve(EntityKind::Pet, EntityId::new(5)), None);
        assert_eq!(remap.len(EntityKind::Client), 1);
    }

    #[test]
    fn single_ref_is_rewritten() {
        let mut remap = IdRemap::new();
        remap.record(EntityKind::Client, EntityId::new(5), EntityId::new(101));

        let mut metadata = meta(&[("owner_id", Value::Int(5)), ("breed", "collie".into())]);
        rewrite_metadata(EntityKind::Pet, &mut metadata, &mut remap);

        assert_eq!(metadata.get("owner_id"), Some(&Value::Int(101)));
        assert_eq!(metadata.get("breed").and_then(Value::as_str), Some("collie"));
        assert_eq!(remap.dropped(), 0);
    }

    #[test]
    fn orphan_single_ref_is_dropped_and_counted() {
        let mut remap = IdRemap::new();
        let mut metadata = meta(&[("owner_id", Value::Int(999))]);
        rewrite_metadata(EntityKind::Pet, &mut metadata, &mut remap);

        assert!(!metadata.contains_key("owner_id"));
        assert_eq!(remap.dropped(), 1);
    }

    #[test]
    fn list_keeps_resolvable_elements_only() {
        let mut remap = IdRemap::new();
        remap.record(EntityKind::Pet, EntityId::new(9), EntityId::new(102));

        let mut metadata = meta(&[(
            "appointment_pet_ids",
            Value::Array(vec![Value::Int(9), Value::Int(777)]),
        )]);
        rewrite_metadata(EntityKind::Appointment, &mut metadata, &mut remap);

        assert_eq!(
            metadata.get("appointment_pet_ids"),
            Some(&Value::Array(vec![Value::Int(102)]))
        );
        assert_eq!(remap.dropped(), 1);
    }

    #[test]
    fn emptied_list_is_stored_empty_not_omitted() {
        let mut remap = IdRemap::new();
        let mut metadata = meta(&[("appointment_pet_ids", Value::Array(vec![Value::Int(777)]))]);
        rewrite_metadata(EntityKind::Appointment, &mut metadata, &mut remap);

        assert_eq!(metadata.get("appointment_pet_ids"), Some(&Value::Array(Vec::new())));
    }

    #[test]
    fn absent_keys_are_left_alone() {
        let mut remap = IdRemap::new();
        let mut metadata = meta(&[("note", "no refs here".into())]);
        rewrite_metadata(EntityKind::Pet, &mut metadata, &mut remap);

        assert_eq!(metadata.len(), 1);
        assert_eq!(remap.dropped(), 0);
    }
}
