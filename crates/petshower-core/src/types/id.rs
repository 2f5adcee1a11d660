//! Entity identifiers.

use serde::{Deserialize, Serialize};

/// A store-assigned entity identifier, unique within its [`EntityKind`].
///
/// Ids are assigned by the store on insert and are never reused within a
/// store instance. Two stores assign ids independently, which is why the
/// snapshot engine carries a remap table during restore.
///
/// [`EntityKind`]: super::EntityKind
///
/// # Example
///
/// ```
/// use petshower_core::EntityId;
///
/// let id = EntityId::new(42);
/// assert_eq!(id.as_u64(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Create an entity id from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id = EntityId::new(7);
        assert_eq!(id.as_u64(), 7);
        assert_eq!(EntityId::from(7u64), id);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&EntityId::new(12)).expect("serialize");
        assert_eq!(json, "12");
    }
}
