//! Mirrored sheet tables - full refresh and row counts

use rusqlite::types::Value as SqlValue;
use rusqlite::Result as SqliteResult;
use serde_json::Value;

use super::super::Database;
use crate::normalizer::Record;
use crate::source::Dataset;

/// Outcome of refreshing one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub inserted: usize,
    pub failed: usize,
}

impl Database {
    /// Replace every row of the dataset's table with `records`.
    ///
    /// Delete and inserts run in one transaction, so readers see either the
    /// previous contents or the new ones. A row that fails to insert is
    /// logged and skipped without aborting the rest.
    pub fn replace_dataset(&self, dataset: Dataset, records: &[Record]) -> SqliteResult<SyncCounts> {
        let table = dataset.as_str();
        let columns = dataset.columns();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", table), [])?;

        let mut counts = SyncCounts::default();
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for record in records {
                let values: Vec<SqlValue> = columns
                    .iter()
                    .map(|column| to_sql_value(record.get(*column)))
                    .collect();

                match stmt.execute(rusqlite::params_from_iter(values.iter())) {
                    Ok(_) => counts.inserted += 1,
                    Err(e) => {
                        log::error!(
                            "[db] {} - error inserting row id={}: {}",
                            table,
                            record.get("id").map(|v| v.to_string()).unwrap_or_default(),
                            e
                        );
                        counts.failed += 1;
                    }
                }
            }
        }

        tx.commit()?;
        Ok(counts)
    }

    /// Number of rows currently stored for a dataset
    pub fn count_rows(&self, dataset: Dataset) -> SqliteResult<i64> {
        let conn = self.lock();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", dataset.as_str()), [], |row| {
            row.get(0)
        })
    }
}

/// Bind a sheet cell. Nested arrays/objects are stored as JSON text.
fn to_sql_value(cell: Option<&Value>) -> SqlValue {
    match cell {
        None | Some(Value::Null) => SqlValue::Null,
        Some(Value::Bool(b)) => SqlValue::Integer(i64::from(*b)),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real))
            .unwrap_or(SqlValue::Null),
        Some(Value::String(s)) => SqlValue::Text(s.clone()),
        Some(other) => SqlValue::Text(other.to_string()),
    }
}
