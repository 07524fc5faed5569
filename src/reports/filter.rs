use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::window::PeriodWindow;
use crate::domain::Transaction;

/// Sign-based split between outflows and inflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Gain,
}

impl TransactionKind {
    pub fn matches(self, amount: f64) -> bool {
        match self {
            TransactionKind::Expense => amount < 0.0,
            TransactionKind::Gain => amount > 0.0,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" => Ok(TransactionKind::Expense),
            "gain" | "gains" => Ok(TransactionKind::Gain),
            other => Err(format!("unknown transaction kind `{other}`")),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Expense => f.write_str("expenses"),
            TransactionKind::Gain => f.write_str("gains"),
        }
    }
}

/// Copies of the transactions matching every given criterion.
///
/// A missing criterion matches everything; category comparison is exact.
pub fn filter_transactions(
    transactions: &[Transaction],
    kind: Option<TransactionKind>,
    category: Option<&str>,
    window: Option<&PeriodWindow>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|txn| kind.map_or(true, |kind| kind.matches(txn.amount)))
        .filter(|txn| category.map_or(true, |category| txn.category == category))
        .filter(|txn| window.map_or(true, |window| window.contains(txn.date)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, d, h, min, s).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new("Rent", "Rent", -900.0, at(3, 5, 0, 0, 0)),
            Transaction::new("Salary", "Income", 2500.0, at(3, 28, 9, 0, 0)),
            Transaction::new("Dinner", "Food", -60.0, at(4, 4, 23, 59, 59)),
            Transaction::new("Lunch", "Food", -15.0, at(4, 5, 12, 0, 0)),
        ]
    }

    #[test]
    fn kind_follows_sign() {
        assert!(TransactionKind::Expense.matches(-0.01));
        assert!(!TransactionKind::Expense.matches(0.0));
        assert!(TransactionKind::Gain.matches(3.0));
        assert_eq!("Expenses".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfers".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn combines_kind_category_and_window() {
        let window = PeriodWindow::for_month(2024, 3, 5).unwrap();
        let expenses = filter_transactions(
            &sample(),
            Some(TransactionKind::Expense),
            None,
            Some(&window),
        );
        let names: Vec<_> = expenses.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Dinner"]);

        let food = filter_transactions(&sample(), None, Some("Food"), None);
        assert_eq!(food.len(), 2);
        assert_eq!(filter_transactions(&sample(), None, None, None).len(), 4);
    }
}
