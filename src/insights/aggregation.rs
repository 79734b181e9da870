//! Budget-vs-actual aggregation over one month of transactions.
//!
//! All functions here are pure: they take in-memory transactions and budgets
//! and never touch the database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    budget::Budget,
    category::Category,
    month::YearMonth,
    transaction::{Transaction, TransactionType},
};

/// The total amount spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category the money was spent on.
    pub category: Category,
    /// The sum of the expenses in `category`.
    pub amount: Decimal,
}

/// Total expenses per category for a month.
///
/// Each category appears at most once. Categories are kept in the order they
/// were first encountered so that ties can be broken deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTotals(Vec<CategoryTotal>);

impl CategoryTotals {
    /// Add `amount` to the total for `category`.
    fn add(&mut self, category: Category, amount: Decimal) {
        match self.0.iter_mut().find(|total| total.category == category) {
            Some(total) => total.amount += amount,
            None => self.0.push(CategoryTotal { category, amount }),
        }
    }

    /// The total spent in `category`, if anything was spent in it.
    pub fn get(&self, category: Category) -> Option<Decimal> {
        self.0
            .iter()
            .find(|total| total.category == category)
            .map(|total| total.amount)
    }

    /// The number of categories with spending.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was spent.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the totals in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.0.iter()
    }
}

/// Sum the expenses in `month` by category.
///
/// Income and transactions dated outside of `month` are ignored.
pub fn category_totals(transactions: &[Transaction], month: YearMonth) -> CategoryTotals {
    let mut totals = CategoryTotals::default();

    for transaction in transactions.iter().filter(|transaction| {
        transaction.transaction_type == TransactionType::Expense && month.contains(transaction.date)
    }) {
        totals.add(transaction.category, transaction.amount);
    }

    totals
}

/// Which budgeted categories are over or under budget.
///
/// A category whose spending exactly matches its budget is in neither list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparison {
    /// Categories where more was spent than budgeted, in budget order.
    pub over_budget: Vec<Category>,
    /// Categories where less was spent than budgeted, in budget order.
    pub under_budget: Vec<Category>,
}

/// Compare the spending in `totals` against `budgets`.
///
/// `budgets` should all be for the month that `totals` was computed for.
/// Categories without a budget are not compared, even if money was spent in
/// them. A budgeted category with no spending counts as zero spent.
pub fn compare_budgets(totals: &CategoryTotals, budgets: &[Budget]) -> BudgetComparison {
    let mut comparison = BudgetComparison::default();

    for budget in budgets {
        let spent = totals.get(budget.category).unwrap_or(Decimal::ZERO);

        if spent > budget.amount {
            comparison.over_budget.push(budget.category);
        } else if spent < budget.amount {
            comparison.under_budget.push(budget.category);
        }
    }

    comparison
}

/// The `n` categories with the highest spending, highest first.
///
/// Categories with equal spending keep their first-encountered order.
pub fn top_categories(totals: &CategoryTotals, n: usize) -> Vec<CategoryTotal> {
    let mut sorted: Vec<CategoryTotal> = totals.iter().copied().collect();
    // `sort_by` is stable, which keeps ties in first-encountered order.
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.truncate(n);

    sorted
}
