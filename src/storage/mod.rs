//! Persistence for transactions, recurring templates and configuration.
//!
//! [`Storage`] is implemented by [`JsonStore`] (two JSON documents on disk)
//! and [`SqlStore`] (SQLite). Each backend owns its own state; nothing is
//! shared between them.

pub mod json_backend;
pub mod sql_backend;

use std::{collections::BTreeMap, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    config::{BackendKind, StorageSettings},
    currency::normalize_currency,
    domain::{is_unset, Config, ConfigDefaults, RecurringTemplate, Transaction},
    errors::{Result, ValidationError},
    utils::{Clock, SystemClock},
};

pub use json_backend::JsonStore;
pub use sql_backend::SqlStore;

/// Capability surface shared by both backends. Callers always get owned copies.
pub trait Storage: Send + Sync {
    /// Current configuration, created from defaults if none exists yet.
    fn config(&self) -> Result<Config>;

    fn categories(&self) -> Result<Vec<String>> {
        Ok(self.config()?.categories)
    }

    /// Sanitizes every name; duplicates are dropped keeping first-seen order.
    fn update_categories(&self, categories: Vec<String>) -> Result<()>;

    fn currency(&self) -> Result<String> {
        Ok(self.config()?.currency)
    }

    /// Accepts any supported code case-insensitively; stores it lowercase.
    fn update_currency(&self, currency: &str) -> Result<()>;

    fn start_date(&self) -> Result<u32> {
        Ok(self.config()?.start_date)
    }

    fn update_start_date(&self, start_date: u32) -> Result<()>;

    fn language(&self) -> Result<String> {
        Ok(self.config()?.language)
    }

    fn update_language(&self, language: &str) -> Result<()>;

    fn opening_balance(&self) -> Result<f64> {
        Ok(self.config()?.opening_balance)
    }

    fn update_opening_balance(&self, balance: f64) -> Result<()>;

    fn use_manual_balances(&self) -> Result<bool> {
        Ok(self.config()?.use_manual_balances)
    }

    fn update_use_manual_balances(&self, enabled: bool) -> Result<()>;

    fn manual_balances(&self) -> Result<BTreeMap<String, f64>> {
        Ok(self.config()?.manual_balances)
    }

    fn update_manual_balances(&self, balances: BTreeMap<String, f64>) -> Result<()>;

    /// Every transaction, newest first.
    fn transactions(&self) -> Result<Vec<Transaction>>;

    fn transaction(&self, id: &str) -> Result<Transaction>;

    /// Stores a transaction and returns it as persisted, ID included.
    fn add_transaction(&self, transaction: Transaction) -> Result<Transaction>;

    /// Adds one by one; a failure leaves earlier items committed.
    fn add_transactions(&self, transactions: Vec<Transaction>) -> Result<Vec<Transaction>> {
        transactions
            .into_iter()
            .map(|transaction| self.add_transaction(transaction))
            .collect()
    }

    fn remove_transaction(&self, id: &str) -> Result<()>;

    /// Removes whichever of `ids` exist and reports how many were deleted.
    fn remove_transactions(&self, ids: &[String]) -> Result<usize>;

    fn update_transaction(&self, id: &str, transaction: Transaction) -> Result<Transaction>;

    fn recurring_templates(&self) -> Result<Vec<RecurringTemplate>>;

    fn recurring_template(&self, id: &str) -> Result<RecurringTemplate>;

    /// Stores the rule and materializes its instances from the start date.
    fn add_recurring_template(&self, template: RecurringTemplate) -> Result<RecurringTemplate>;

    /// With `update_all` every instance is regenerated; otherwise only those
    /// dated after now are replaced.
    fn update_recurring_template(
        &self,
        id: &str,
        template: RecurringTemplate,
        update_all: bool,
    ) -> Result<RecurringTemplate>;

    /// With `remove_all` every instance goes; otherwise instances dated on or
    /// before now are kept.
    fn remove_recurring_template(&self, id: &str, remove_all: bool) -> Result<()>;
}

/// Construction options shared by both backends.
#[derive(Clone)]
pub struct StoreOptions {
    pub defaults: ConfigDefaults,
    pub clock: Arc<dyn Clock>,
}

impl StoreOptions {
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            defaults: ConfigDefaults::STANDARD,
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Opens the backend selected by `settings` with standard options.
pub fn open_storage(settings: &StorageSettings) -> Result<Box<dyn Storage>> {
    open_storage_with(settings, StoreOptions::default())
}

pub fn open_storage_with(
    settings: &StorageSettings,
    options: StoreOptions,
) -> Result<Box<dyn Storage>> {
    info!(backend = %settings.kind, url = %settings.url, "opening storage");
    match settings.kind {
        BackendKind::Json => Ok(Box::new(JsonStore::open_with(settings.data_dir(), options)?)),
        BackendKind::Sqlite => Ok(Box::new(SqlStore::open_with(
            settings.database_path(),
            options,
        )?)),
    }
}

pub(crate) fn check_start_date(start_date: u32) -> std::result::Result<u32, ValidationError> {
    if (1..=31).contains(&start_date) {
        Ok(start_date)
    } else {
        Err(ValidationError::StartDateOutOfRange(start_date))
    }
}

pub(crate) fn check_balance(balance: f64) -> std::result::Result<f64, ValidationError> {
    if balance.is_finite() {
        Ok(balance)
    } else {
        Err(ValidationError::NonFiniteAmount)
    }
}

pub(crate) fn check_balances(
    balances: &BTreeMap<String, f64>,
) -> std::result::Result<(), ValidationError> {
    balances.values().try_for_each(|balance| check_balance(*balance).map(|_| ()))
}

/// Blank currencies take the configured one; anything else must be supported.
pub(crate) fn resolve_currency(
    currency: &Option<String>,
    fallback: &str,
) -> std::result::Result<String, ValidationError> {
    match currency.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => normalize_currency(code),
        _ => Ok(fallback.to_string()),
    }
}

/// Defaults and validation applied to a transaction before it is inserted.
pub(crate) fn prepare_new_transaction(
    transaction: &mut Transaction,
    default_currency: &str,
    now: DateTime<Utc>,
) -> std::result::Result<(), ValidationError> {
    if is_unset(&transaction.date) {
        transaction.date = now;
    }
    transaction.id = transaction.id.trim().to_string();
    transaction.currency = Some(resolve_currency(&transaction.currency, default_currency)?);
    transaction.validate()
}

pub(crate) fn prepare_updated_transaction(
    id: &str,
    transaction: &mut Transaction,
    default_currency: &str,
) -> std::result::Result<(), ValidationError> {
    transaction.id = id.to_string();
    transaction.currency = Some(resolve_currency(&transaction.currency, default_currency)?);
    transaction.validate()
}

pub(crate) fn prepare_template(
    template: &mut RecurringTemplate,
    default_currency: &str,
) -> std::result::Result<(), ValidationError> {
    template.validate()?;
    template.currency = Some(resolve_currency(&template.currency, default_currency)?);
    Ok(())
}

/// A future-only regeneration restarts at the first occurrence on or after
/// `now`; drop it when an instance dated exactly `now` was kept.
pub(crate) fn skip_retained_occurrence(
    instances: &mut Vec<Transaction>,
    now: DateTime<Utc>,
    kept_one_at_now: bool,
) {
    if kept_one_at_now {
        instances.retain(|instance| instance.date != now);
    }
}

pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
}
