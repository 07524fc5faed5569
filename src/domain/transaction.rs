//! A single recorded money movement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{is_unset, zero_timestamp, Amounted, Identifiable};
use crate::{
    errors::ValidationError,
    validation::{sanitize, sanitize_optional},
};

const OUTFLOW_PREFIX: &str = "BAU";
const INFLOW_PREFIX: &str = "RES";

/// A recorded expense (negative amount) or gain (positive amount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub category: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default = "zero_timestamp")]
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Builds a transaction with no ID; stores assign one on insert.
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            recurring_id: None,
            description: description.into(),
            from: None,
            to: None,
            method: None,
            note: None,
            category: category.into(),
            amount,
            currency: None,
            date,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sanitizes free-text fields in place, then enforces required fields.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.description = sanitize(&self.description);
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        self.from = sanitize_optional(self.from.as_deref());
        self.to = sanitize_optional(self.to.as_deref());
        self.method = sanitize_optional(self.method.as_deref());
        self.note = sanitize_optional(self.note.as_deref());
        self.category = sanitize(&self.category);
        if self.category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if self.amount == 0.0 {
            return Err(ValidationError::ZeroAmount);
        }
        if is_unset(&self.date) {
            return Err(ValidationError::MissingDate);
        }
        Ok(())
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn has_currency(&self) -> bool {
        self.currency
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }

    pub fn belongs_to(&self, template_id: &str) -> bool {
        self.recurring_id.as_deref() == Some(template_id)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Formats a sequence-numbered ID: `BAU-0001` for outflows, `RES-0001` for inflows.
pub fn generate_transaction_id(is_gain: bool, counter: u32) -> String {
    let prefix = if is_gain { INFLOW_PREFIX } else { OUTFLOW_PREFIX };
    format!("{prefix}-{counter:04}")
}
