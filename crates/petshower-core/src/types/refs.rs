//! The metadata reference schema.
//!
//! Most metadata values are opaque to the snapshot engine, but a handful
//! of well-known keys hold cross-entity references that must be rewritten
//! when ids change during restore. Those keys are declared here, once per
//! entity kind, as tagged [`RefKind`] entries; the restore orchestrator
//! walks this schema generically instead of hard-coding key names.

use super::EntityKind;

/// How a metadata value relates to other entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A plain scalar with no reference semantics.
    Scalar,
    /// A single id referencing an entity of the given kind.
    EntityRef(EntityKind),
    /// A list of ids, each referencing an entity of the given kind.
    ///
    /// Elements whose target is absent from the restore batch are dropped;
    /// a list emptied this way is stored empty, not omitted.
    EntityRefList(EntityKind),
    /// A nested structure the engine carries verbatim.
    Opaque,
}

/// The reference-bearing metadata keys for an entity kind.
///
/// Keys not listed here are treated as [`RefKind::Scalar`] and copied
/// verbatim. Clients and attachments reference nothing.
#[must_use]
pub fn reference_schema(kind: EntityKind) -> &'static [(&'static str, RefKind)] {
    match kind {
        EntityKind::Pet => &[("owner_id", RefKind::EntityRef(EntityKind::Client))],
        EntityKind::Appointment => &[
            ("appointment_client_id", RefKind::EntityRef(EntityKind::Client)),
            ("appointment_pet_id", RefKind::EntityRef(EntityKind::Pet)),
            ("appointment_pet_ids", RefKind::EntityRefList(EntityKind::Pet)),
        ],
        EntityKind::Client | EntityKind::Attachment => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pets_reference_their_owner() {
        let schema = reference_schema(EntityKind::Pet);
        assert_eq!(schema, &[("owner_id", RefKind::EntityRef(EntityKind::Client))]);
    }

    #[test]
    fn appointments_reference_client_and_pets() {
        let schema = reference_schema(EntityKind::Appointment);
        assert_eq!(schema.len(), 3);
        assert!(schema
            .iter()
            .any(|(k, r)| *k == "appointment_pet_ids"
                && *r == RefKind::EntityRefList(EntityKind::Pet)));
    }

    #[test]
    fn clients_and_attachments_reference_nothing() {
        assert!(reference_schema(EntityKind::Client).is_empty());
        assert!(reference_schema(EntityKind::Attachment).is_empty());
    }
}
