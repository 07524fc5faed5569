//! Domain records: transactions, recurring templates and configuration.
//! No I/O here; both storage backends share these types.

pub mod common;
pub mod config;
pub mod recurring;
pub mod transaction;

pub use common::{is_unset, position_by_id, zero_timestamp, Amounted, Identifiable};
pub use config::{Config, ConfigDefaults};
pub use recurring::{RecurrenceInterval, RecurringTemplate, MAX_OCCURRENCES};
pub use transaction::{generate_transaction_id, Transaction};
