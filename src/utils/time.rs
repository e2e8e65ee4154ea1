//! Time utilities for index timestamps
//!
//! The index stores `created_at` as Unix milliseconds, so every timestamp that
//! reaches the store is truncated to millisecond precision first. That keeps a
//! record read back from the store equal to the one written.

use chrono::{DateTime, Utc};

/// Current time truncated to millisecond precision
///
/// # Examples
/// ```
/// use btms_overlay::utils::time::{now_millis, to_millis, from_millis};
/// let now = now_millis();
/// assert_eq!(from_millis(to_millis(&now)), Some(now));
/// ```
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    from_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Unix milliseconds for a timestamp
pub fn to_millis(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

/// Timestamp from Unix milliseconds; `None` when out of chrono's range
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}
