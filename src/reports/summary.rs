use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::window::PeriodWindow;
use crate::domain::Transaction;

/// Label used for transactions without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Dashboard figures for one period. Expense totals are positive numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySummary {
    pub window: PeriodWindow,
    pub total_expenses: f64,
    pub total_gains: f64,
    pub net_balance: f64,
    pub transaction_count: usize,
    /// Largest spend first.
    pub expenses_by_category: Vec<CategoryTotal>,
}

impl MonthlySummary {
    pub fn compute(transactions: &[Transaction], window: PeriodWindow) -> Self {
        let mut total_expenses = 0.0;
        let mut total_gains = 0.0;
        let mut transaction_count = 0;
        let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();

        for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
            transaction_count += 1;
            if txn.amount < 0.0 {
                total_expenses += txn.amount.abs();
                *by_category.entry(category_label(&txn.category)).or_insert(0.0) +=
                    txn.amount.abs();
            } else {
                total_gains += txn.amount;
            }
        }

        let mut expenses_by_category: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect();
        expenses_by_category.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        Self {
            window,
            total_expenses,
            total_gains,
            net_balance: total_gains - total_expenses,
            transaction_count,
            expenses_by_category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalancePoint {
    pub id: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub balance: f64,
}

/// Balance after each transaction, oldest first.
pub fn running_balances(transactions: &[Transaction], opening_balance: f64) -> Vec<BalancePoint> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    let mut balance = opening_balance;
    ordered
        .into_iter()
        .map(|txn| {
            balance += txn.amount;
            BalancePoint {
                id: txn.id.clone(),
                date: txn.date,
                amount: txn.amount,
                balance,
            }
        })
        .collect()
}

pub(crate) fn category_label(category: &str) -> &str {
    if category.trim().is_empty() {
        UNCATEGORIZED
    } else {
        category
    }
}
