#![doc(test(attr(deny(warnings))))]

//! Expense Core is the storage and domain layer of a single-user finance
//! tracker: validated transactions, recurring templates, two interchangeable
//! storage backends and the aggregates reports are built from.

pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod recurrence;
pub mod reports;
pub mod storage;
pub mod utils;
pub mod validation;

use std::sync::Once;

pub use errors::{Result, StoreError, ValidationError};
pub use storage::{open_storage, Storage};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
