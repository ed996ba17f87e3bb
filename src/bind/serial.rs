//! SOA serial bookkeeping.
use chrono::{DateTime, Datelike, Utc};

/// Date-coded starting serial (`YYYYMMDD00`) for a zone that has none yet.
pub fn seed(now: DateTime<Utc>) -> i64 {
    let date = now.date_naive();
    (i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day()))
        * 100
}

/// Serial to store after one accepted change.
pub fn next_serial(current: i64) -> i64 {
    current + 1
}
