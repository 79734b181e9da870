//! Database initialization and helpers shared by the table modules.

use std::str::FromStr;

use rusqlite::{Connection, Row, Transaction as SqlTransaction, types::Type};
use rust_decimal::Decimal;

use crate::{Error, budget::create_budget_table, transaction::create_transaction_table};

/// The largest amount a transaction or budget may have: one trillion.
///
/// Capping single amounts keeps sums over any realistic number of
/// transactions well below [Decimal::MAX], so totals never overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Create all the tables for the domain models.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Decimals are stored as TEXT so that amounts are kept exactly.
pub(crate) fn decimal_to_sql(amount: &Decimal) -> String {
    amount.normalize().to_string()
}

/// Read a decimal stored by [decimal_to_sql] from column `index` of `row`.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::db::{MAX_AMOUNT, decimal_to_sql, get_decimal, initialize};

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    }

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialization failed");
        initialize(&conn).expect("second initialization failed");
    }

    #[test]
    fn decimals_round_trip_exactly() {
        let conn = Connection::open_in_memory().unwrap();
        let amount = dec!(0.1) + dec!(0.2);

        let got = conn
            .query_row("SELECT ?1", (decimal_to_sql(&amount),), |row| {
                get_decimal(row, 0)
            })
            .unwrap();

        assert_eq!(got, dec!(0.3));
    }

    #[test]
    fn rejects_text_that_is_not_a_number() {
        let conn = Connection::open_in_memory().unwrap();

        let result = conn.query_row("SELECT 'twelve'", (), |row| get_decimal(row, 0));

        assert!(result.is_err());
    }
}
