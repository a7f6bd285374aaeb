//! Document totals and balance maintenance.

pub mod balance;

pub use balance::{DocumentTotals, ItemAmounts, paid_from_applications, recompute_balance};
