use serde_json::Value;

/// A JSON-valued column. The sheet usually ships these as encoded strings;
/// text that does not parse is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonBlob {
    Json(Value),
    Raw(String),
}

impl JsonBlob {
    pub fn from_cell(cell: &Value) -> Option<JsonBlob> {
        match cell {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(v) => Some(JsonBlob::Json(v)),
                Err(_) => Some(JsonBlob::Raw(s.clone())),
            },
            other => Some(JsonBlob::Json(other.clone())),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            JsonBlob::Json(v) => Some(v),
            JsonBlob::Raw(_) => None,
        }
    }
}
