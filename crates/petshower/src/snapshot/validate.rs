//! The document gatekeeper.
//!
//! Every candidate document passes through [`validate`] before the
//! restore path is allowed to wipe anything. The checks run in a fixed
//! order and short-circuit on the first failure; none of them touch the
//! store or the filesystem.

use serde_json::Value as Json;

use super::document::{SnapshotDocument, FORMAT_ID, SCHEMA_VERSION};
use super::error::ValidationError;

/// The collections a document must carry for restore to be meaningful.
///
/// The remaining collections (attachments, loose files, custom tables,
/// options) default to empty when absent.
const REQUIRED_COLLECTIONS: [&str; 4] = ["clients", "pets", "appointments", "transactions"];

/// Check a raw JSON payload and decode it into a [`SnapshotDocument`].
///
/// Checks, in order: the payload parses as a JSON object, its
/// `format_id` is [`FORMAT_ID`], its `schema_version` is exactly
/// [`SCHEMA_VERSION`], every required collection is present and is a
/// list, and the whole object decodes into the document type (which is
/// where malformed base64 file payloads surface).
///
/// # Errors
///
/// Returns the [`ValidationError`] variant naming the first check that
/// failed.
pub fn validate(raw: &str) -> Result<SnapshotDocument, ValidationError> {
    let value: Json =
        serde_json::from_str(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(ValidationError::Malformed("document is not a JSON object".into()));
    };

    // Identity first: a foreign file gets a foreign-file error, not a
    // complaint about its version field.
    let found = object.get("format_id").and_then(Json::as_str).unwrap_or_default();
    if found != FORMAT_ID {
        return Err(ValidationError::ForeignDocument { found: found.to_owned() });
    }

    match object.get("schema_version").and_then(Json::as_u64) {
        Some(SCHEMA_VERSION) => {}
        Some(version) => return Err(ValidationError::UnsupportedVersion(version)),
        None => {
            return Err(ValidationError::Malformed("schema_version is missing or not a number".into()))
        }
    }

    for name in REQUIRED_COLLECTIONS {
        match object.get(name) {
            None => return Err(ValidationError::MissingCollection(name)),
            Some(v) if !v.is_array() => return Err(ValidationError::NotACollection(name)),
            Some(_) => {}
        }
    }

    serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
}
