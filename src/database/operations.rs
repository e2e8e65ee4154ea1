//! SQLite implementation of the index store

use crate::database::helpers::{amount_to_sql, token_record_from_row, TOKEN_SELECT_COLUMNS};
use crate::database::traits::IndexStore;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::types::{Page, RecordFilter, TokenRecord};
use crate::utils::time::to_millis;
use rusqlite::{ffi, params, OptionalExtension};
use tracing::debug;

impl IndexStore for Database {
    fn insert(&self, record: &TokenRecord) -> AppResult<()> {
        let amount = amount_to_sql(record.amount)?;
        let connection = self.lock()?;

        let result = connection.execute(
            r#"INSERT INTO token_outputs
               (txid, output_index, asset_id, amount, owner_key, metadata, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                record.txid,
                record.output_index,
                record.asset_id,
                amount,
                record.owner_key,
                record.metadata,
                to_millis(&record.created_at)
            ],
        );

        match result {
            Ok(_) => {
                debug!("Indexed {} ({} of {})", record.outpoint(), record.amount, record.asset_id);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(AppError::DuplicateOutpoint {
                    txid: record.txid.clone(),
                    output_index: record.output_index,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_by_outpoint(&self, txid: &str, output_index: u32) -> AppResult<bool> {
        let removed = self.lock()?.execute(
            "DELETE FROM token_outputs WHERE txid = ?1 AND output_index = ?2",
            params![txid, output_index],
        )?;
        debug!("Removed {} record(s) for {}.{}", removed, txid, output_index);
        Ok(removed > 0)
    }

    fn find_by_filter(&self, filter: &RecordFilter, page: Page) -> AppResult<Vec<TokenRecord>> {
        let direction = page.sort_order.as_sql();
        let sql = format!(
            r#"SELECT {}
               FROM token_outputs
               WHERE (?1 IS NULL OR asset_id = ?1)
                 AND (?2 IS NULL OR owner_key = ?2)
               ORDER BY created_at {dir}, id {dir}
               LIMIT ?3 OFFSET ?4"#,
            TOKEN_SELECT_COLUMNS,
            dir = direction
        );

        let connection = self.lock()?;
        let mut stmt = connection.prepare_cached(&sql)?;
        let rows = stmt.query_map(
            params![filter.asset_id, filter.owner_key, page.limit, page.skip],
            token_record_from_row,
        )?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn find_by_outpoint(&self, txid: &str, output_index: u32) -> AppResult<Option<TokenRecord>> {
        let sql = format!(
            "SELECT {} FROM token_outputs WHERE txid = ?1 AND output_index = ?2",
            TOKEN_SELECT_COLUMNS
        );
        let record = self
            .lock()?
            .query_row(&sql, params![txid, output_index], token_record_from_row)
            .optional()?;
        Ok(record)
    }

    fn count(&self) -> AppResult<u64> {
        let count: i64 =
            self.lock()?
                .query_row("SELECT COUNT(*) FROM token_outputs", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
