//! Monthly per-category budgets.

mod core;
mod endpoints;

pub use core::{Budget, count_budgets, create_budget_table, get_budgets_for_month, upsert_budget};
pub use endpoints::{get_budgets_endpoint, set_budget_endpoint};
