//! In-memory copy of the synced datasets
//!
//! Each dataset is swapped in whole by the sync; readers take an `Arc`
//! snapshot and never observe a partially loaded list.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::models::{Account, Organization};

#[derive(Default)]
pub struct DirectoryHandle {
    organizations: RwLock<Option<Arc<Vec<Organization>>>>,
    accounts: RwLock<Option<Arc<Vec<Account>>>>,
}

impl DirectoryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Organizations, or None if they never loaded
    pub fn organizations(&self) -> Option<Arc<Vec<Organization>>> {
        self.organizations.read().clone()
    }

    /// Accounts, or None if they never loaded
    pub fn accounts(&self) -> Option<Arc<Vec<Account>>> {
        self.accounts.read().clone()
    }

    pub fn replace_organizations(&self, organizations: Vec<Organization>) {
        *self.organizations.write() = Some(Arc::new(organizations));
    }

    pub fn replace_accounts(&self, accounts: Vec<Account>) {
        *self.accounts.write() = Some(Arc::new(accounts));
    }
}
