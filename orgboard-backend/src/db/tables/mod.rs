//! Database model modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific concern.

mod mirror;  // organization, account (full refresh from the sheet)
mod reports; // SQL report queries over the mirrored tables

pub use mirror::SyncCounts;
