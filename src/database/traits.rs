//! Index store abstraction
//!
//! The lookup service only talks to the index through `IndexStore`, so any
//! keyed document store with these guarantees can stand in for SQLite:
//!
//! - `(txid, output_index)` is unique; inserting a duplicate is an error
//! - deleting an absent outpoint is a no-op
//! - results are ordered by `created_at`, ties by insertion order

use crate::errors::AppResult;
use crate::types::{Page, RecordFilter, TokenRecord};

pub trait IndexStore: Send + Sync {
    /// Insert a record for a newly admitted outpoint
    fn insert(&self, record: &TokenRecord) -> AppResult<()>;

    /// Remove the record for an outpoint, returning whether one existed
    fn delete_by_outpoint(&self, txid: &str, output_index: u32) -> AppResult<bool>;

    /// Records matching every supplied filter
    fn find_by_filter(&self, filter: &RecordFilter, page: Page) -> AppResult<Vec<TokenRecord>>;

    /// All records
    fn find_all(&self, page: Page) -> AppResult<Vec<TokenRecord>> {
        self.find_by_filter(&RecordFilter::default(), page)
    }

    fn find_by_outpoint(&self, txid: &str, output_index: u32) -> AppResult<Option<TokenRecord>>;

    fn count(&self) -> AppResult<u64>;
}
