//! The budget model and its database queries.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::Category,
    database_id::BudgetId,
    db::{MAX_AMOUNT, decimal_to_sql, get_decimal},
    month::YearMonth,
};

/// A planned spending ceiling for one category in one month.
///
/// There is at most one budget per category and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category the budget applies to.
    pub category: Category,
    /// The month the budget applies to.
    pub month: YearMonth,
    /// The most that should be spent on `category` in `month`.
    pub amount: Decimal,
}

/// Set the budget for `category` in `month` to `amount`.
///
/// If a budget already exists for the category and month its amount is
/// replaced, otherwise a new budget is created.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeBudget] if `amount` is less than zero,
/// - [Error::AmountTooLarge] if `amount` is more than [MAX_AMOUNT],
/// - or [Error::SqlError] if there is some other SQL error.
pub fn upsert_budget(
    category: Category,
    month: YearMonth,
    amount: Decimal,
    connection: &Connection,
) -> Result<Budget, Error> {
    if amount < Decimal::ZERO {
        return Err(Error::NegativeBudget);
    }

    if amount > MAX_AMOUNT {
        return Err(Error::AmountTooLarge);
    }

    let budget = connection
        .prepare(
            "INSERT INTO budget (category, month, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(category, month) DO UPDATE SET amount = excluded.amount
             RETURNING id, category, month, amount",
        )?
        .query_row((category, month, decimal_to_sql(&amount)), map_budget_row)?;

    Ok(budget)
}

/// Retrieve all the budgets for `month` in the order they were first set.
///
/// Returns an empty list if no budgets have been set for the month.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_budgets_for_month(
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, category, month, amount FROM budget
             WHERE month = :month
             ORDER BY id ASC",
        )?
        .query_map(&[(":month", &month)], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Get the total number of budgets in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_budgets(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM budget;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            category TEXT NOT NULL,
            month TEXT NOT NULL,
            amount TEXT NOT NULL,
            UNIQUE(category, month)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_month ON budget(month);",
    )
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        month: row.get(2)?,
        amount: get_decimal(row, 3)?,
    })
}
