//! Lookup query validation
//!
//! Turns the framework's untyped JSON query into an index filter and page.

use crate::config::LookupConfig;
use crate::errors::LookupError;
use crate::types::{LookupQuery, Page, RecordFilter};
use serde_json::Value;

/// A query ready to run against the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub filter: RecordFilter,
    pub page: Page,
    pub history: bool,
}

/// Validate a query body and apply paging defaults
///
/// - `null` (or an absent body) is a missing query
/// - anything other than an object, unknown keys, or badly-typed values are invalid
/// - `limit` defaults to `limits.default_limit` and is capped at `limits.max_limit`
pub fn resolve_query(query: &Value, limits: &LookupConfig) -> Result<ResolvedQuery, LookupError> {
    if query.is_null() {
        return Err(LookupError::MissingQuery);
    }
    if !query.is_object() {
        return Err(LookupError::InvalidQuery(format!(
            "query must be a JSON object, got {}",
            json_kind(query)
        )));
    }

    let parsed: LookupQuery = serde_json::from_value(query.clone())
        .map_err(|e| LookupError::InvalidQuery(e.to_string()))?;

    let limit = match parsed.limit {
        Some(0) => {
            return Err(LookupError::InvalidQuery(
                "limit must be greater than zero".to_string(),
            ))
        }
        Some(limit) => limit.min(limits.max_limit),
        None => limits.default_limit,
    };

    Ok(ResolvedQuery {
        filter: RecordFilter {
            asset_id: parsed.asset_id,
            owner_key: parsed.owner_key,
        },
        page: Page {
            limit,
            skip: parsed.skip.unwrap_or(0),
            sort_order: parsed.sort_order.unwrap_or_default(),
        },
        history: parsed.history.unwrap_or(false),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
