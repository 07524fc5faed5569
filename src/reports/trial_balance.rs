use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::summary::{category_label, CategoryTotal};
use crate::{domain::Transaction, utils::Clock};

/// Statement figures arranged so that reported debits equal reported credits.
///
/// Outflows are debits and inflows are credits, both summed per category as
/// positive numbers. The closing balance sits on the debit side and the
/// opening balance on the credit side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialBalance {
    pub opening_balance: f64,
    /// Sorted by category name.
    pub debits: Vec<CategoryTotal>,
    pub credits: Vec<CategoryTotal>,
    pub total_expenses: f64,
    pub total_gains: f64,
    pub closing_balance: f64,
    pub total_debits: f64,
    pub total_credits: f64,
}

impl TrialBalance {
    pub fn compute(transactions: &[Transaction], opening_balance: f64) -> Self {
        let mut debit_map: BTreeMap<&str, f64> = BTreeMap::new();
        let mut credit_map: BTreeMap<&str, f64> = BTreeMap::new();
        for txn in transactions {
            let category = category_label(&txn.category);
            if txn.amount < 0.0 {
                *debit_map.entry(category).or_insert(0.0) += txn.amount.abs();
            } else if txn.amount > 0.0 {
                *credit_map.entry(category).or_insert(0.0) += txn.amount;
            }
        }

        let debits = into_totals(debit_map);
        let credits = into_totals(credit_map);
        let total_expenses: f64 = debits.iter().map(|d| d.amount).sum();
        let total_gains: f64 = credits.iter().map(|c| c.amount).sum();
        let closing_balance = opening_balance + total_gains - total_expenses;

        Self {
            opening_balance,
            debits,
            credits,
            total_expenses,
            total_gains,
            closing_balance,
            total_debits: total_expenses + closing_balance,
            total_credits: opening_balance + total_gains,
        }
    }

    pub fn is_balanced(&self) -> bool {
        let scale = (self.opening_balance.abs() + self.total_gains + self.total_expenses).max(1.0);
        (self.total_debits - self.total_credits).abs() <= f64::EPSILON * 8.0 * scale
    }
}

fn into_totals(map: BTreeMap<&str, f64>) -> Vec<CategoryTotal> {
    map.into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect()
}

/// Optional bounds for a statement, both inclusive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementPeriod {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl StatementPeriod {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| instant >= start)
            && self.end.map_or(true, |end| instant <= end)
    }

    /// Year printed on the statement: the start's, else the end's, else the current one.
    pub fn fiscal_year(&self, clock: &dyn Clock) -> i32 {
        self.start
            .or(self.end)
            .map(|instant| instant.year())
            .unwrap_or_else(|| clock.now().year())
    }

    pub fn trial_balance(
        &self,
        transactions: &[Transaction],
        opening_balance: f64,
    ) -> TrialBalance {
        let within: Vec<Transaction> = transactions
            .iter()
            .filter(|txn| self.contains(txn.date))
            .cloned()
            .collect();
        TrialBalance::compute(&within, opening_balance)
    }
}
