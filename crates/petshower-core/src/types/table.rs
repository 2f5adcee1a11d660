//! Custom-table snapshots.
//!
//! Add-ons may create their own relational tables under the store's
//! managed naming convention. The snapshot engine captures those tables
//! whole — schema and rows — and restores them verbatim; it understands
//! nothing about their contents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Value;

/// One row of a custom table: a column-name to value map.
pub type Row = BTreeMap<String, Value>;

/// A captured custom table.
///
/// The store-instance-specific table prefix is factored out of both the
/// name and the schema so a snapshot taken against one prefix restores
/// cleanly under another. The schema DDL carries the literal placeholder
/// `{prefix}` where the destination prefix belongs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTable {
    /// Table name with the managed prefix stripped.
    pub name: String,
    /// Structural definition (DDL) with `{prefix}` placeholders.
    pub schema: String,
    /// All rows, carried verbatim.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl CustomTable {
    /// The placeholder substituted with the destination prefix on restore.
    pub const PREFIX_PLACEHOLDER: &'static str = "{prefix}";

    /// Create an empty table snapshot.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self { name: name.into(), schema: schema.into(), rows: Vec::new() }
    }

    /// The table's full name under the given prefix.
    #[must_use]
    pub fn qualified_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.name)
    }

    /// The schema DDL with placeholders substituted for the given prefix.
    #[must_use]
    pub fn schema_for(&self, prefix: &str) -> String {
        self.schema.replace(Self::PREFIX_PLACEHOLDER, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_substitution() {
        let table = CustomTable::new(
            "reminder_log",
            "CREATE TABLE {prefix}reminder_log (id INTEGER PRIMARY KEY)",
        );

        assert_eq!(table.qualified_name("ps_"), "ps_reminder_log");
        assert_eq!(
            table.schema_for("ps_"),
            "CREATE TABLE ps_reminder_log (id INTEGER PRIMARY KEY)"
        );
    }
}
