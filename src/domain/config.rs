//! Per-deployment settings shared by every backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{recurring::RecurringTemplate, transaction::generate_transaction_id};
use crate::errors::ValidationError;

/// Values a fresh configuration starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDefaults {
    pub categories: &'static [&'static str],
    pub currency: &'static str,
    pub start_date: u32,
    pub language: &'static str,
}

impl ConfigDefaults {
    pub const STANDARD: ConfigDefaults = ConfigDefaults {
        categories: &[
            "Food",
            "Groceries",
            "Travel",
            "Rent",
            "Utilities",
            "Entertainment",
            "Healthcare",
            "Shopping",
            "Miscellaneous",
            "Income",
        ],
        currency: "usd",
        start_date: 1,
        language: "en",
    };
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub categories: Vec<String>,
    pub currency: String,
    pub start_date: u32,
    #[serde(default)]
    pub language: String,
    /// Last number handed out for outflow (`BAU-`) IDs.
    #[serde(default)]
    pub voucher_counter: u32,
    /// Last number handed out for inflow (`RES-`) IDs.
    #[serde(default)]
    pub receipt_counter: u32,
    #[serde(default)]
    pub opening_balance: f64,
    #[serde(default)]
    pub use_manual_balances: bool,
    #[serde(default)]
    pub manual_balances: BTreeMap<String, f64>,
    #[serde(default)]
    pub recurring_expenses: Vec<RecurringTemplate>,
}

impl Config {
    pub fn from_defaults(defaults: &ConfigDefaults) -> Self {
        Self {
            categories: defaults.categories.iter().map(|c| c.to_string()).collect(),
            currency: defaults.currency.to_string(),
            start_date: defaults.start_date,
            language: defaults.language.to_string(),
            voucher_counter: 0,
            receipt_counter: 0,
            opening_balance: 0.0,
            use_manual_balances: false,
            manual_balances: BTreeMap::new(),
            recurring_expenses: Vec::new(),
        }
    }

    /// Bumps the matching counter and formats the next ID from it.
    pub fn next_transaction_id(&mut self, is_gain: bool) -> Result<String, ValidationError> {
        let counter = if is_gain {
            &mut self.receipt_counter
        } else {
            &mut self.voucher_counter
        };
        *counter = counter
            .checked_add(1)
            .ok_or(ValidationError::CounterExhausted)?;
        Ok(generate_transaction_id(is_gain, *counter))
    }

    /// Language with the legacy empty value mapped to the default.
    pub fn language_or(&self, fallback: &str) -> String {
        if self.language.is_empty() {
            fallback.to_string()
        } else {
            self.language.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_defaults(&ConfigDefaults::STANDARD)
    }
}
