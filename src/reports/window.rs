use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, recurrence::days_in_month};

/// Reporting period for one month, both bounds inclusive.
///
/// With a start day of 1 this is the calendar month. Otherwise it runs from
/// the start day of the month to the day before the start day of the next
/// month. Start days past the end of a month land on its last day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    pub fn for_month(year: i32, month: u32, start_day: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        if !(1..=31).contains(&start_day) {
            return Err(ValidationError::StartDateOutOfRange(start_day));
        }
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let start = period_start(year, month, start_day)
            .ok_or(ValidationError::InvalidMonth(month))?;
        let next = period_start(next_year, next_month, start_day)
            .ok_or(ValidationError::InvalidMonth(month))?;
        Ok(Self {
            start,
            end: next - Duration::seconds(1),
        })
    }

    /// The window `instant` falls in, for the given start day.
    pub fn containing(instant: DateTime<Utc>, start_day: u32) -> Result<Self, ValidationError> {
        let current = Self::for_month(instant.year(), instant.month(), start_day)?;
        if instant >= current.start {
            return Ok(current);
        }
        if instant.month() == 1 {
            Self::for_month(instant.year() - 1, 12, start_day)
        } else {
            Self::for_month(instant.year(), instant.month() - 1, start_day)
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

fn period_start(year: i32, month: u32, start_day: u32) -> Option<DateTime<Utc>> {
    let day = start_day.min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}
