//! All-time income, expense and balance figures.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    month::YearMonth,
    transaction::{Transaction, TransactionType},
};

/// The total expenses for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// The month the expenses fall in.
    pub month: YearMonth,
    /// The sum of the expenses in `month`.
    pub amount: Decimal,
}

/// Totals across every recorded transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
    /// Expenses per month, oldest month first.
    ///
    /// Months without any expenses are omitted.
    pub monthly_expenses: Vec<MonthlyTotal>,
}

/// Compute the totals for `transactions`.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut monthly_expenses: BTreeMap<YearMonth, Decimal> = BTreeMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => {
                total_expenses += transaction.amount;
                *monthly_expenses
                    .entry(YearMonth::of(transaction.date))
                    .or_default() += transaction.amount;
            }
        }
    }

    Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        monthly_expenses: monthly_expenses
            .into_iter()
            .map(|(month, amount)| MonthlyTotal { month, amount })
            .collect(),
    }
}
