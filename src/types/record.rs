//! Index record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One unspent admitted token output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub txid: String,
    pub output_index: u32,
    pub asset_id: String,
    pub amount: u64,
    /// Hex-encoded locking public key
    pub owner_key: String,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn outpoint(&self) -> String {
        format!("{}.{}", self.txid, self.output_index)
    }
}

/// Optional equality filters, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub asset_id: Option<String>,
    pub owner_key: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.asset_id.is_none() && self.owner_key.is_none()
    }
}

/// Ordering on `created_at`, ties broken by insertion order in the same direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order {:?} (expected asc or desc)", other)),
        }
    }
}

/// Page window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub skip: u32,
    pub sort_order: SortOrder,
}
