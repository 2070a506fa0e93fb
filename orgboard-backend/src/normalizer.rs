//! Row normalizer - turns a `[headerRow, ...dataRows]` matrix into records
//!
//! Values pass through untouched. A row shorter than the header simply has
//! no entry for the missing columns.

use serde_json::{Map, Value};

/// One data row keyed by column name, in header order
pub type Record = Map<String, Value>;

/// Raw sheet payload as returned by the source: header row first
pub type SheetTable = Vec<Vec<Value>>;

/// Convert a header + rows matrix into one record per data row
pub fn rows_to_records(table: &[Vec<Value>]) -> Vec<Record> {
    let Some((header, rows)) = table.split_first() else {
        return Vec::new();
    };

    let columns: Vec<String> = header.iter().map(header_name).collect();

    rows.iter()
        .map(|row| {
            columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect::<Record>()
        })
        .collect()
}

fn header_name(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
