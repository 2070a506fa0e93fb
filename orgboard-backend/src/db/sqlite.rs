//! SQLite database - schema definitions and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, in_memory, init)
//! - Schema creation for the mirrored `organization` and `account` tables
//!
//! Table operations and report queries live in the tables/ subdirectory.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Main database wrapper, one connection guarded by a Mutex
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and initialize schema
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        Self::with_connection(Connection::open(database_url)?)
    }

    /// Private in-memory database, used by tests
    #[cfg(test)]
    pub fn in_memory() -> SqliteResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqliteResult<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// Lock the connection. A poisoned lock still holds a usable connection.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create the mirrored tables if they don't exist
    fn init(&self) -> SqliteResult<()> {
        let conn = self.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS organization (
                createdDate TEXT,
                updatedDate TEXT,
                deletedAt TEXT,
                id TEXT PRIMARY KEY,
                orgName VARCHAR(255),
                shopifyStoreId INTEGER,
                myShopifyDomain VARCHAR(255),
                numBillingRetries INTEGER,
                numFailedCyclesBeforeCancel INTEGER,
                delayBetweenRetries INTEGER,
                logo BLOB,
                billingTime TIME,
                billingTimezone TEXT,
                initialSubscriptionImportComplete BOOLEAN,
                monthly_fee INTEGER,
                per_transaction_fee INTEGER,
                per_transaction_percentage_fee INTEGER,
                billing_start_date TEXT,
                account JSON,
                alloyUserId TEXT,
                activeWorkflows JSON,
                setup JSON,
                outOfStockBehavior TEXT,
                cancellationMessage TEXT,
                hasVisitedRetention BOOLEAN,
                rewardsPointMeaningId TEXT,
                hasOTPEnabled BOOLEAN,
                instagramUserData JSON,
                lookerDashboardPrefix TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS account (
                createdDate TEXT,
                updatedDate TEXT,
                deletedAt TEXT,
                id TEXT PRIMARY KEY,
                shopifyId TEXT,
                uniqueShopifyId TEXT,
                receivedFromShopifyDate TEXT,
                shopifyUpdateDate TEXT,
                planName TEXT,
                status TEXT,
                approvedAt TEXT,
                trialDays INTEGER,
                usageLineItemShopifyId TEXT,
                planFee INTEGER,
                transactionFee INTEGER,
                percentageFee INTEGER,
                organizationId TEXT,
                features JSON,
                confirmationUrl TEXT,
                trialPeriodStart TEXT,
                trialPeriodEnd TEXT,
                reportUsageAt TEXT
            )",
            [],
        )?;

        Ok(())
    }
}
