//! Entity types.
//!
//! An [`Entity`] is a typed record with a fixed set of scalar
//! [`Attributes`] plus an open-ended metadata map. The snapshot engine
//! reads entities during export and inserts them during restore; it never
//! mutates one in place.
//!
//! # Example
//!
//! ```
//! use petshower_core::{Attributes, Entity, EntityId, EntityKind};
//!
//! let client = Entity::new(
//!     EntityId::new(5),
//!     EntityKind::Client,
//!     Attributes::titled("Dana Voss"),
//! )
//! .with_meta("phone", "555-0117");
//!
//! assert_eq!(client.kind, EntityKind::Client);
//! assert!(client.meta("phone").is_some());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntityId, Value};

/// The metadata map attached to an entity: an unordered mapping from
/// string key to [`Value`].
///
/// A `BTreeMap` keeps snapshot output deterministic for a fixed store
/// state.
pub type Metadata = BTreeMap<String, Value>;

/// The fixed set of entity types the snapshot engine manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A client (pet owner) record.
    Client,
    /// A pet record; references its owner via `owner_id` metadata.
    Pet,
    /// An appointment; references a client and one or more pets.
    Appointment,
    /// A binary attachment; may carry a file payload on disk.
    Attachment,
}

impl EntityKind {
    /// Every managed kind, in restore order.
    ///
    /// Clients restore before pets, pets before appointments, so that each
    /// step can resolve ids assigned by the steps before it. Attachments
    /// come last; nothing references them by remapped id.
    pub const ALL: [EntityKind; 4] =
        [EntityKind::Client, EntityKind::Pet, EntityKind::Appointment, EntityKind::Attachment];

    /// A stable lowercase name, used in table names and log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Pet => "pet",
            EntityKind::Appointment => "appointment",
            EntityKind::Attachment => "attachment",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed scalar fields every entity carries.
///
/// Attributes are copied verbatim between stores; none of them are entity
/// references. The `author` field points at an operator account, which is
/// outside the managed data set and deliberately not remapped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Lifecycle status, e.g. `"publish"` or `"draft"`.
    #[serde(default)]
    pub status: String,
    /// Freeform body text.
    #[serde(default)]
    pub body: String,
    /// Short summary text.
    #[serde(default)]
    pub excerpt: String,
    /// Creation timestamp, RFC 3339.
    #[serde(default)]
    pub created_at: String,
    /// URL-safe slug.
    #[serde(default)]
    pub slug: String,
    /// Operator account reference; not part of the managed entity set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<i64>,
}

impl Attributes {
    /// Create attributes with just a title, everything else defaulted.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }
}

/// A typed, identified record with fixed attributes and an open-ended
/// metadata map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The store-assigned id, unique within `kind`.
    pub id: EntityId,
    /// The entity type.
    pub kind: EntityKind,
    /// Fixed scalar fields.
    pub attributes: Attributes,
    /// Open key-value metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Entity {
    /// Create an entity with empty metadata.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, attributes: Attributes) -> Self {
        Self { id, kind, attributes, metadata: Metadata::new() }
    }

    /// Add a metadata entry (builder style).
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata value by key.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_metadata() {
        let pet = Entity::new(EntityId::new(1), EntityKind::Pet, Attributes::titled("Rex"))
            .with_meta("owner_id", 5i64)
            .with_meta("breed", "collie");

        assert_eq!(pet.meta("owner_id").and_then(Value::as_int), Some(5));
        assert_eq!(pet.meta("breed").and_then(Value::as_str), Some("collie"));
        assert!(pet.meta("missing").is_none());
    }

    #[test]
    fn kind_order_is_restore_order() {
        assert_eq!(EntityKind::ALL[0], EntityKind::Client);
        assert_eq!(EntityKind::ALL[3], EntityKind::Attachment);
    }

    #[test]
    fn attributes_skip_absent_author() {
        let attrs = Attributes::titled("x");
        let json = serde_json::to_string(&attrs).expect("serialize");
        assert!(!json.contains("author"));
    }
}
