//! Request bodies for the transaction endpoints.
//!
//! Every field is optional at the parsing stage so that a missing field is
//! reported as [Error::MissingFields] rather than a generic parse failure.

use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The body of a request to create a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPayload {
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl TransactionPayload {
    /// Validate the payload and convert it into a [TransactionBuilder].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if a field is missing or blank,
    /// - [Error::InvalidCategory] if the category is not a known category,
    /// - or [Error::NonPositiveAmount] if the amount is zero or negative.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let (Some(amount), Some(date), Some(description), Some(category)) =
            (self.amount, self.date, self.description, self.category)
        else {
            return Err(Error::MissingFields);
        };

        if description.trim().is_empty() || category.trim().is_empty() {
            return Err(Error::MissingFields);
        }

        let builder = Transaction::build(amount, date, description.trim(), category.parse()?)
            .transaction_type(self.transaction_type);
        builder.validate()?;

        Ok(builder)
    }
}

/// The body of a request to replace a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct EditTransactionPayload {
    pub id: Option<TransactionId>,
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl EditTransactionPayload {
    /// Validate the payload and split it into the target ID and the new contents.
    ///
    /// # Errors
    /// Returns the same errors as [TransactionPayload::into_builder], and
    /// [Error::MissingFields] if the ID is missing.
    pub fn into_parts(self) -> Result<(TransactionId, TransactionBuilder), Error> {
        let id = self.id.ok_or(Error::MissingFields)?;

        let builder = TransactionPayload {
            amount: self.amount,
            date: self.date,
            description: self.description,
            category: self.category,
            transaction_type: self.transaction_type,
        }
        .into_builder()?;

        Ok((id, builder))
    }
}

/// The body of a request to delete a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTransactionPayload {
    pub id: Option<TransactionId>,
}
