//! Remote sheet source
//!
//! The spreadsheet web app answers `?type=<dataset>` with a JSON matrix:
//! the header row first, then one array per data row.

mod http;
mod retry;

pub use http::HttpSheetSource;

use async_trait::async_trait;

use crate::models::{ACCOUNT_COLUMNS, ORGANIZATION_COLUMNS};
use crate::normalizer::SheetTable;

/// The two datasets mirrored from the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Organization,
    Account,
}

impl Dataset {
    /// Value of the `type` query parameter, also the table name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Organization => "organization",
            Dataset::Account => "account",
        }
    }

    /// Stored columns, in sheet order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Dataset::Organization => ORGANIZATION_COLUMNS,
            Dataset::Account => ACCOUNT_COLUMNS,
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum SourceError {
    /// Source URL could not be parsed
    InvalidUrl(String),
    /// Transport failure (connect, timeout, body read)
    Http(reqwest::Error),
    /// Non-success HTTP status
    Status(u16),
    /// Body is not a JSON array of rows
    Decode(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::InvalidUrl(e) => write!(f, "invalid source URL: {}", e),
            SourceError::Http(e) => write!(f, "request failed: {}", e),
            SourceError::Status(code) => write!(f, "source responded with HTTP {}", code),
            SourceError::Decode(e) => write!(f, "unexpected payload: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

/// Anything that can hand back a dataset as a header + rows matrix
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_table(&self, dataset: Dataset) -> Result<SheetTable, SourceError>;
}
