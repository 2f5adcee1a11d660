//! Ledger rows.
//!
//! The ledger is a flat financial table provided by an optional
//! collaborator. Its rows carry foreign-key-shaped references to clients
//! and appointments plus scalar business fields; the snapshot engine
//! rewrites the references and carries the rest verbatim.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Whether a ledger entry records money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// A payment received.
    Income,
    /// A cost incurred.
    Expense,
}

/// A flat financial record referencing a client and/or appointment.
///
/// The row's own numeric id is store-local and is never carried across a
/// restore; the destination assigns a fresh one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The store-assigned row id; `None` before insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// The client this entry belongs to, if any.
    pub client_ref: Option<EntityId>,
    /// The appointment this entry belongs to, if any.
    pub appointment_ref: Option<EntityId>,
    /// Monetary amount.
    pub amount: f64,
    /// Income or expense.
    pub kind: LedgerKind,
    /// Business status, e.g. `"paid"` or `"open"`.
    pub status: String,
    /// Entry date, RFC 3339.
    pub entry_date: String,
}

impl LedgerEntry {
    /// Create an entry with no foreign keys set.
    #[must_use]
    pub fn new(amount: f64, kind: LedgerKind, status: impl Into<String>) -> Self {
        Self {
            id: None,
            client_ref: None,
            appointment_ref: None,
            amount,
            kind,
            status: status.into(),
            entry_date: String::new(),
        }
    }

    /// Set the client reference.
    #[must_use]
    pub fn with_client(mut self, id: EntityId) -> Self {
        self.client_ref = Some(id);
        self
    }

    /// Set the appointment reference.
    #[must_use]
    pub fn with_appointment(mut self, id: EntityId) -> Self {
        self.appointment_ref = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_references() {
        let entry = LedgerEntry::new(100.0, LedgerKind::Income, "paid")
            .with_client(EntityId::new(5))
            .with_appointment(EntityId::new(20));

        assert_eq!(entry.client_ref, Some(EntityId::new(5)));
        assert_eq!(entry.appointment_ref, Some(EntityId::new(20)));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&LedgerKind::Expense).expect("serialize");
        assert_eq!(json, "\"expense\"");
    }
}
