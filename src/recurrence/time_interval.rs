use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::RecurrenceInterval;

/// Date of the occurrence `steps` intervals after `anchor`.
///
/// Month and year steps are always taken from the anchor, clamping to the
/// last day of shorter months, so a series anchored on the 31st lands on
/// Feb 29 and then returns to Mar 31. Time of day is kept. Returns `None`
/// for unrecognized intervals or dates chrono cannot represent.
pub fn step_from(
    anchor: DateTime<Utc>,
    interval: &RecurrenceInterval,
    steps: u32,
) -> Option<DateTime<Utc>> {
    match interval {
        RecurrenceInterval::Daily => anchor.checked_add_signed(Duration::days(steps as i64)),
        RecurrenceInterval::Weekly => anchor.checked_add_signed(Duration::weeks(steps as i64)),
        RecurrenceInterval::Monthly => {
            let date = shift_month(anchor.date_naive(), i32::try_from(steps).ok()?)?;
            Some(date.and_time(anchor.time()).and_utc())
        }
        RecurrenceInterval::Yearly => {
            let date = shift_year(anchor.date_naive(), i32::try_from(steps).ok()?)?;
            Some(date.and_time(anchor.time()).and_utc())
        }
        RecurrenceInterval::Other(_) => None,
    }
}

pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month())?);
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}
