use chrono::{DateTime, NaiveDate, Utc};

/// Exposes the string identifier a record is stored under.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Shared shape of anything that carries a signed amount.
pub trait Amounted {
    fn amount(&self) -> f64;

    /// Positive amounts are inflows; negative amounts are outflows.
    fn is_gain(&self) -> bool {
        self.amount() > 0.0
    }
}

/// The "unset" timestamp, `0001-01-01T00:00:00Z`.
///
/// Older data files write this value for dates that were never filled in.
pub fn zero_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn is_unset(date: &DateTime<Utc>) -> bool {
    *date <= zero_timestamp()
}

/// Finds the index of the record with `id`.
pub fn position_by_id<T: Identifiable>(records: &[T], id: &str) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}
