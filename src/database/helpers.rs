//! Shared row mapping for index queries

use crate::errors::AppError;
use crate::types::TokenRecord;
use crate::utils::time::from_millis;
use rusqlite::types::Type;
use rusqlite::Row;

/// Standard SELECT columns for TokenRecord queries
///
/// Use this constant when building queries to ensure consistent column order
/// with `token_record_from_row()`.
pub const TOKEN_SELECT_COLUMNS: &str =
    "txid, output_index, asset_id, amount, owner_key, metadata, created_at";

/// Construct a TokenRecord from a database row
///
/// Expects columns in the order defined by `TOKEN_SELECT_COLUMNS`.
pub fn token_record_from_row(row: &Row) -> rusqlite::Result<TokenRecord> {
    let amount: i64 = row.get(3)?;
    let amount = u64::try_from(amount)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?;

    let created_at_ms: i64 = row.get(6)?;
    let created_at = from_millis(created_at_ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Integer,
            Box::new(AppError::InvalidData(format!(
                "created_at out of range: {}",
                created_at_ms
            ))),
        )
    })?;

    Ok(TokenRecord {
        txid: row.get(0)?,
        output_index: row.get(1)?,
        asset_id: row.get(2)?,
        amount,
        owner_key: row.get(4)?,
        metadata: row.get(5)?,
        created_at,
    })
}

/// Amount as stored by SQLite's signed 64-bit integers
pub fn amount_to_sql(amount: u64) -> Result<i64, AppError> {
    i64::try_from(amount)
        .map_err(|_| AppError::InvalidData(format!("amount {} exceeds storable range", amount)))
}
