//! Aggregates over transaction lists: period windows, filters, dashboard
//! summaries and trial-balance statements. Everything here is pure.

pub mod filter;
pub mod summary;
pub mod trial_balance;
pub mod window;

pub use filter::{filter_transactions, TransactionKind};
pub use summary::{running_balances, BalancePoint, CategoryTotal, MonthlySummary, UNCATEGORIZED};
pub use trial_balance::{StatementPeriod, TrialBalance};
pub use window::PeriodWindow;
