mod account;
mod blob;
mod organization;

pub use account::{Account, ACCOUNT_COLUMNS};
pub use blob::JsonBlob;
pub use organization::{Organization, ORGANIZATION_COLUMNS};

use serde_json::Value;

use crate::normalizer::Record;

/// Read a cell as text. Numbers and booleans become their text form,
/// null and absent cells become None.
pub(crate) fn cell_text(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Read a JSON blob cell
pub(crate) fn cell_blob(record: &Record, key: &str) -> Option<JsonBlob> {
    record.get(key).and_then(JsonBlob::from_cell)
}
