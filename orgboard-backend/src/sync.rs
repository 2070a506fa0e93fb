//! Startup sync - mirror the sheet into SQLite and memory
//!
//! Both datasets are fetched concurrently. A dataset that fails to fetch
//! leaves its table and its in-memory copy untouched.

use std::sync::Arc;

use crate::db::{Database, SyncCounts};
use crate::directory::DirectoryHandle;
use crate::models::{Account, Organization};
use crate::normalizer::rows_to_records;
use crate::source::{Dataset, SheetSource};

/// Result of syncing one dataset
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSync {
    Loaded(SyncCounts),
    Failed(String),
}

impl DatasetSync {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DatasetSync::Loaded(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    pub organizations: DatasetSync,
    pub accounts: DatasetSync,
}

/// Refresh both datasets; returns once both have finished
pub async fn sync_all(
    source: &dyn SheetSource,
    db: &Arc<Database>,
    directory: &DirectoryHandle,
) -> SyncSummary {
    let (organizations, accounts) = tokio::join!(
        sync_dataset(source, db, directory, Dataset::Organization),
        sync_dataset(source, db, directory, Dataset::Account),
    );
    SyncSummary {
        organizations,
        accounts,
    }
}

async fn sync_dataset(
    source: &dyn SheetSource,
    db: &Arc<Database>,
    directory: &DirectoryHandle,
    dataset: Dataset,
) -> DatasetSync {
    let table = match source.fetch_table(dataset).await {
        Ok(t) => t,
        Err(e) => {
            log::error!("[sync] Error fetching {} data: {}", dataset, e);
            return DatasetSync::Failed(e.to_string());
        }
    };

    let records = rows_to_records(&table);

    let db = Arc::clone(db);
    let to_store = records.clone();
    let stored = tokio::task::spawn_blocking(move || db.replace_dataset(dataset, &to_store)).await;
    let counts = match stored {
        Ok(Ok(counts)) => counts,
        Ok(Err(e)) => {
            log::error!("[sync] Error storing {} data: {}", dataset, e);
            return DatasetSync::Failed(e.to_string());
        }
        Err(e) => {
            log::error!("[sync] {} store task failed: {}", dataset, e);
            return DatasetSync::Failed(e.to_string());
        }
    };

    match dataset {
        Dataset::Organization => {
            directory.replace_organizations(records.into_iter().map(Organization::from_record).collect())
        }
        Dataset::Account => {
            directory.replace_accounts(records.into_iter().map(Account::from_record).collect())
        }
    }

    if counts.failed > 0 {
        log::warn!(
            "[sync] {} data loaded: {} rows stored, {} rows failed",
            dataset,
            counts.inserted,
            counts.failed
        );
    } else {
        log::info!("[sync] {} data loaded: {} rows", dataset, counts.inserted);
    }

    DatasetSync::Loaded(counts)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::normalizer::SheetTable;
    use crate::source::SourceError;
    use async_trait::async_trait;
    use serde_json::json;

    /// Source serving fixed tables; a missing table fails with HTTP 503
    pub(crate) struct StaticSource {
        pub organizations: Option<SheetTable>,
        pub accounts: Option<SheetTable>,
    }

    #[async_trait]
    impl SheetSource for StaticSource {
        async fn fetch_table(&self, dataset: Dataset) -> Result<SheetTable, SourceError> {
            let table = match dataset {
                Dataset::Organization => &self.organizations,
                Dataset::Account => &self.accounts,
            };
            table.clone().ok_or(SourceError::Status(503))
        }
    }

    pub(crate) fn sample_source() -> StaticSource {
        StaticSource {
            organizations: Some(
                serde_json::from_value(json!([
                    ["createdDate", "id", "orgName", "myShopifyDomain", "setup"],
                    ["2023-01-20T00:00:00Z", "1", "Acme", "acme.myshopify.com",
                     "{\"optimization\":{\"enabled\":true}}"],
                    ["2022-02-01T00:00:00Z", "2", "Globex", "globex.myshopify.com", ""],
                    ["2024-07-04T00:00:00Z", "3", "Initech", "initech.myshopify.com", ""]
                ]))
                .unwrap(),
            ),
            accounts: Some(
                serde_json::from_value(json!([
                    ["id", "organizationId", "status", "planName", "features"],
                    ["a1", "1", "CANCELLED", "Pro", "{\"PASSWORDLESS\":true}"],
                    ["a2", "2", "ACTIVE", "Basic", "{}"],
                    ["a3", "2", "ACTIVE", "Plus", "{}"]
                ]))
                .unwrap(),
            ),
        }
    }

    #[tokio::test]
    async fn test_sync_loads_store_and_directory() {
        let db = Arc::new(Database::in_memory().unwrap());
        let directory = DirectoryHandle::new();

        let summary = sync_all(&sample_source(), &db, &directory).await;

        assert_eq!(
            summary.organizations,
            DatasetSync::Loaded(SyncCounts { inserted: 3, failed: 0 })
        );
        assert!(summary.accounts.is_loaded());
        assert_eq!(db.count_rows(Dataset::Account).unwrap(), 3);
        assert_eq!(directory.organizations().unwrap().len(), 3);
        assert_eq!(directory.accounts().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_table() {
        let db = Arc::new(Database::in_memory().unwrap());
        let directory = DirectoryHandle::new();
        sync_all(&sample_source(), &db, &directory).await;

        let failing = StaticSource {
            organizations: sample_source().organizations,
            accounts: None,
        };
        let fresh_directory = DirectoryHandle::new();
        let summary = sync_all(&failing, &db, &fresh_directory).await;

        assert!(summary.organizations.is_loaded());
        assert!(matches!(summary.accounts, DatasetSync::Failed(_)));
        assert_eq!(db.count_rows(Dataset::Account).unwrap(), 3);
        assert!(fresh_directory.accounts().is_none());
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let db = Arc::new(Database::in_memory().unwrap());
        let directory = DirectoryHandle::new();

        sync_all(&sample_source(), &db, &directory).await;
        let first = (
            db.count_orgs_without_accounts().unwrap(),
            db.orgs_with_single_account().unwrap(),
            db.passwordless_orgs().unwrap(),
        );
        sync_all(&sample_source(), &db, &directory).await;
        let second = (
            db.count_orgs_without_accounts().unwrap(),
            db.orgs_with_single_account().unwrap(),
            db.passwordless_orgs().unwrap(),
        );

        assert_eq!(first, second);
        assert_eq!(db.count_rows(Dataset::Organization).unwrap(), 3);
    }
}
