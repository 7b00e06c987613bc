use chrono::{DateTime, NaiveDate, Utc};

/// Converts a Unix timestamp (seconds) to a UTC datetime.
///
/// `block_date` is always derived from this value's date component rather
/// than computed independently, so the two can never disagree.
pub fn unix_to_utc(timestamp: u64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
}

/// The UTC calendar date component of a Unix timestamp.
pub fn unix_to_utc_date(timestamp: u64) -> NaiveDate {
    unix_to_utc(timestamp).date_naive()
}
