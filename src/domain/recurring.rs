//! Recurring templates and their repeat interval.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    common::{is_unset, zero_timestamp, Amounted, Identifiable},
    transaction::Transaction,
};
use crate::{
    errors::ValidationError,
    validation::{sanitize, sanitize_optional},
};

/// Upper bound on instances a single template may materialize.
///
/// Unbounded templates (`occurrences == 0`) generate exactly this many.
pub const MAX_OCCURRENCES: u32 = 1024;

/// How far apart consecutive occurrences are.
///
/// Values other than the four known ones are kept verbatim so that a stored
/// template round-trips; the expander stops as soon as it meets one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Other(String),
}

impl RecurrenceInterval {
    pub fn as_str(&self) -> &str {
        match self {
            RecurrenceInterval::Daily => "daily",
            RecurrenceInterval::Weekly => "weekly",
            RecurrenceInterval::Monthly => "monthly",
            RecurrenceInterval::Yearly => "yearly",
            RecurrenceInterval::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, RecurrenceInterval::Other(_))
    }
}

impl From<String> for RecurrenceInterval {
    fn from(value: String) -> Self {
        match value.as_str() {
            "daily" => RecurrenceInterval::Daily,
            "weekly" => RecurrenceInterval::Weekly,
            "monthly" => RecurrenceInterval::Monthly,
            "yearly" => RecurrenceInterval::Yearly,
            _ => RecurrenceInterval::Other(value),
        }
    }
}

impl From<&str> for RecurrenceInterval {
    fn from(value: &str) -> Self {
        RecurrenceInterval::from(value.to_string())
    }
}

impl From<RecurrenceInterval> for String {
    fn from(value: RecurrenceInterval) -> Self {
        match value {
            RecurrenceInterval::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecurrenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule that expands into a series of concrete transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub category: String,
    #[serde(default = "zero_timestamp")]
    pub start_date: DateTime<Utc>,
    pub interval: RecurrenceInterval,
    /// Number of instances to generate; `0` means no fixed end.
    #[serde(default)]
    pub occurrences: u32,
}

impl RecurringTemplate {
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        start_date: DateTime<Utc>,
        interval: RecurrenceInterval,
        occurrences: u32,
    ) -> Self {
        Self {
            id: String::new(),
            description: description.into(),
            amount,
            currency: None,
            from: None,
            to: None,
            method: None,
            note: None,
            category: category.into(),
            start_date,
            interval,
            occurrences,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.occurrences == 0
    }

    pub fn has_currency(&self) -> bool {
        self.currency
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }

    /// Sanitizes free-text fields and checks the rule can be expanded.
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
        if is_unset(&self.start_date) {
            return Err(ValidationError::MissingDate);
        }
        if self.occurrences > MAX_OCCURRENCES {
            return Err(ValidationError::TooManyOccurrences {
                requested: self.occurrences,
                limit: MAX_OCCURRENCES,
            });
        }
        Ok(())
    }

    /// The concrete transaction for one occurrence. The ID is left blank.
    pub fn instance(&self, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: String::new(),
            recurring_id: Some(self.id.clone()),
            description: self.description.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            method: self.method.clone(),
            note: self.note.clone(),
            category: self.category.clone(),
            amount: self.amount,
            currency: self.currency.clone(),
            date,
        }
    }
}

impl Identifiable for RecurringTemplate {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for RecurringTemplate {
    fn amount(&self) -> f64 {
        self.amount
    }
}
