#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use expense_core::{
    domain::{RecurrenceInterval, RecurringTemplate, Transaction},
    storage::{JsonStore, SqlStore, StoreOptions},
    utils::FixedClock,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

pub mod contract;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// The instant every test store believes is "now".
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub fn options() -> StoreOptions {
    StoreOptions::default().with_clock(FixedClock::at(fixed_now()))
}

/// A directory that outlives the test that created it.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn json_store() -> JsonStore {
    JsonStore::open_with(temp_dir(), options()).expect("open json store")
}

pub fn sql_store() -> SqlStore {
    SqlStore::open_in_memory_with(options()).expect("open sqlite store")
}

pub fn expense(description: &str, category: &str, amount: f64, date: DateTime<Utc>) -> Transaction {
    Transaction::new(description, category, amount, date)
}

pub fn template(
    description: &str,
    amount: f64,
    start: DateTime<Utc>,
    interval: RecurrenceInterval,
    occurrences: u32,
) -> RecurringTemplate {
    RecurringTemplate::new(description, "Utilities", amount, start, interval, occurrences)
}
