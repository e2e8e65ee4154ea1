//! Index schema
//!
//! One row per unspent admitted token output. Rows are inserted on admission
//! and deleted on spend; nothing is ever updated in place.
//!
//! `id` is the insertion sequence and breaks ties between equal `created_at`
//! values so that paging is stable.

use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

pub const SCHEMA_VERSION: i64 = 1;

/// Create the index tables if they do not exist
pub fn setup_schema(connection: &Connection) -> AppResult<()> {
    connection.execute_batch(
        r#"
        PRAGMA user_version = 1;

        CREATE TABLE IF NOT EXISTS token_outputs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            txid TEXT NOT NULL,
            output_index INTEGER NOT NULL,
            asset_id TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            owner_key TEXT NOT NULL,
            metadata TEXT,
            created_at INTEGER NOT NULL,      -- Unix milliseconds
            UNIQUE (txid, output_index)
        );

        CREATE INDEX IF NOT EXISTS idx_token_outputs_asset ON token_outputs(asset_id);
        CREATE INDEX IF NOT EXISTS idx_token_outputs_owner ON token_outputs(owner_key);
        CREATE INDEX IF NOT EXISTS idx_token_outputs_created ON token_outputs(created_at, id);
        "#,
    )?;

    debug!("Index schema v{} ready", SCHEMA_VERSION);
    Ok(())
}
