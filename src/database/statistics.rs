//! Index statistics for operator reporting

use crate::database::Database;
use crate::errors::AppResult;
use serde::Serialize;

/// Snapshot of index contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_records: u64,
    pub distinct_assets: u64,
    pub distinct_owners: u64,
}

impl Database {
    /// Count records, assets and owners in one pass
    pub fn index_stats(&self) -> AppResult<IndexStats> {
        let stats = self.lock()?.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT asset_id), COUNT(DISTINCT owner_key) FROM token_outputs",
            [],
            |row| {
                Ok(IndexStats {
                    total_records: row.get::<_, i64>(0)? as u64,
                    distinct_assets: row.get::<_, i64>(1)? as u64,
                    distinct_owners: row.get::<_, i64>(2)? as u64,
                })
            },
        )?;
        Ok(stats)
    }
}
