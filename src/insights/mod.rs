//! Spending insights: category totals, budget comparison, top categories,
//! advisory tips and all-time summaries.

mod aggregation;
mod handlers;
mod summary;
mod tip;

pub use aggregation::{
    BudgetComparison, CategoryTotal, CategoryTotals, category_totals, compare_budgets,
    top_categories,
};
pub use handlers::{get_insights_endpoint, get_summary_endpoint};
pub use summary::{MonthlyTotal, Summary, summarize};
pub use tip::{Tip, select_tip};
