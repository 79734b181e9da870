//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::Category,
    database_id::TransactionId,
    db::{MAX_AMOUNT, decimal_to_sql, get_decimal},
    month::YearMonth,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was spent.
    #[default]
    Expense,
    /// Money that was earned.
    Income,
}

impl TransactionType {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FromSqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse()
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction, always positive.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was first recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: Decimal,
        date: Date,
        description: &str,
        category: Category,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            category,
            transaction_type: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder holds every user-editable field of a transaction. It is used
/// both for creating transactions and for replacing the contents of existing
/// ones.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal_macros::dec;
/// use time::{OffsetDateTime, macros::date};
///
/// let transaction = create_transaction(
///     Transaction::build(dec!(2500), date!(2025 - 01 - 15), "Salary", Category::Other)
///         .transaction_type(Some(TransactionType::Income)),
///     OffsetDateTime::now_utc(),
///     &connection,
/// )?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money, must be greater than zero.
    pub amount: Decimal,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction, must not be blank.
    pub description: String,

    /// The category of the transaction.
    pub category: Category,

    /// Whether the money was spent or earned.
    ///
    /// `None` records an expense when creating a transaction and keeps the
    /// stored type when updating one.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionBuilder {
    /// Set the type of the transaction.
    pub fn transaction_type(mut self, transaction_type: Option<TransactionType>) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Check the invariants that every stored transaction must satisfy.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if the amount is zero or negative,
    /// [Error::AmountTooLarge] if it is more than [MAX_AMOUNT], or
    /// [Error::MissingFields] if the description is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount);
        }

        if self.amount > MAX_AMOUNT {
            return Err(Error::AmountTooLarge);
        }

        if self.description.trim().is_empty() {
            return Err(Error::MissingFields);
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, amount, date, description, category, type, created_at, updated_at";

/// Create a new transaction in the database from a builder.
///
/// `now` is recorded as both the creation and last update time.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] or [Error::MissingFields] if the builder is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    insert_transaction(&builder, now, now, connection)
}

fn insert_transaction(
    builder: &TransactionBuilder,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                 (amount, date, description, category, type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                decimal_to_sql(&builder.amount),
                builder.date,
                builder.description.trim(),
                builder.category,
                builder.transaction_type.unwrap_or_default(),
                created_at,
                updated_at,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Insert previously recorded transactions, e.g. from the local store.
///
/// The transactions get new IDs but keep their timestamps. Either all of the
/// transactions are inserted or none are.
///
/// # Errors
/// Returns an error if any transaction is invalid or there is an SQL error.
pub fn import_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let imported = transactions
        .iter()
        .map(|transaction| {
            let builder = Transaction::build(
                transaction.amount,
                transaction.date,
                &transaction.description,
                transaction.category,
            )
            .transaction_type(Some(transaction.transaction_type));

            insert_transaction(
                &builder,
                transaction.created_at,
                transaction.updated_at,
                &sql_transaction,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    sql_transaction.commit()?;

    Ok(imported)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction, most recent date first.
///
/// Transactions on the same date are ordered newest first by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Retrieve the transactions dated within `month`, most recent date first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_month(
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let start = month.first_day()?;
    let end = month.first_day_of_next_month()?;

    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE date >= ?1 AND date < ?2
             ORDER BY date DESC, id DESC"
        ))?
        .query_map((start, end), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace the contents of the transaction `id` with `builder`.
///
/// If the builder does not specify a transaction type, the stored type is kept.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::NonPositiveAmount] or [Error::MissingFields] if the builder is invalid,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET amount = ?1,
                 date = ?2,
                 description = ?3,
                 category = ?4,
                 type = COALESCE(?5, type),
                 updated_at = ?6
             WHERE id = ?7
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                decimal_to_sql(&builder.amount),
                builder.date,
                builder.description.trim(),
                builder.category,
                builder.transaction_type,
                now,
                id,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id`.
///
/// Returns whether a transaction was deleted. Deleting an unknown ID leaves
/// the table untouched and returns `false`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    Ok(rows_affected > 0)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: get_decimal(row, 1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        transaction_type: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
