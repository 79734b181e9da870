//! A file-backed key-value store for keeping transactions without a database.
//!
//! The file holds a single JSON object. The transaction list lives under
//! [TRANSACTIONS_KEY] and is always read and written as a whole. The next ID
//! to hand out lives under [NEXT_ID_KEY] so that IDs of deleted transactions
//! are never reused. Other keys in the file are preserved.
//!
//! The server never reads this store. Use the `import_local` binary to move
//! its transactions into the database.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder},
};

/// The key that the transaction list is stored under.
pub const TRANSACTIONS_KEY: &str = "finance-tracker-transactions";

/// The key that the next unused transaction ID is stored under.
pub const NEXT_ID_KEY: &str = "finance-tracker-next-id";

/// Transactions kept in a local JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Use the file at `path` as the store.
    ///
    /// The file does not need to exist yet, it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get every stored transaction in the order they were saved.
    ///
    /// A missing, unreadable or corrupt store is logged and treated as empty.
    pub fn get_transactions(&self) -> Vec<Transaction> {
        self.try_get_transactions().unwrap_or_else(|error| {
            tracing::warn!(
                "Could not load transactions from {}: {error}",
                self.path.display()
            );
            Vec::new()
        })
    }

    /// Append a new transaction to the store.
    ///
    /// The new transaction gets an ID that no transaction in the store has
    /// ever had, and `now` as its creation and last update time. A builder
    /// without a type records an expense.
    ///
    /// # Errors
    /// Returns a validation error if the builder is invalid, or
    /// [Error::LocalStoreError] if the store could not be read or written.
    pub fn save_transaction(
        &self,
        builder: TransactionBuilder,
        now: OffsetDateTime,
    ) -> Result<Transaction, Error> {
        builder.validate()?;

        let mut transactions = self.try_get_transactions()?;
        let stored_next_id = self
            .read_entries()?
            .get(NEXT_ID_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(1);
        // Files written before the counter existed only have the list to go on.
        let id = transactions
            .iter()
            .map(|transaction| transaction.id + 1)
            .max()
            .unwrap_or(1)
            .max(stored_next_id);

        let transaction = Transaction {
            id,
            amount: builder.amount,
            date: builder.date,
            description: builder.description.trim().to_owned(),
            category: builder.category,
            transaction_type: builder.transaction_type.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        transactions.push(transaction.clone());
        self.write_transactions(&transactions, Some(id + 1))?;

        Ok(transaction)
    }

    /// Replace the contents of the transaction with `id`.
    ///
    /// The creation time is kept and the last update time is set to `now`. A
    /// builder without a type keeps the stored type.
    ///
    /// Returns `None` if no transaction has the ID `id`.
    ///
    /// # Errors
    /// Returns a validation error if the builder is invalid, or
    /// [Error::LocalStoreError] if the store could not be read or written.
    pub fn update_transaction(
        &self,
        id: TransactionId,
        builder: TransactionBuilder,
        now: OffsetDateTime,
    ) -> Result<Option<Transaction>, Error> {
        builder.validate()?;

        let mut transactions = self.try_get_transactions()?;
        let Some(transaction) = transactions
            .iter_mut()
            .find(|transaction| transaction.id == id)
        else {
            return Ok(None);
        };

        transaction.amount = builder.amount;
        transaction.date = builder.date;
        transaction.description = builder.description.trim().to_owned();
        transaction.category = builder.category;
        if let Some(transaction_type) = builder.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        transaction.updated_at = now;

        let updated = transaction.clone();
        self.write_transactions(&transactions, None)?;

        Ok(Some(updated))
    }

    /// Remove the transaction with `id`.
    ///
    /// Returns `false`, leaving the file untouched, if no transaction has the
    /// ID `id`.
    ///
    /// # Errors
    /// Returns [Error::LocalStoreError] if the store could not be read or written.
    pub fn delete_transaction(&self, id: TransactionId) -> Result<bool, Error> {
        let mut transactions = self.try_get_transactions()?;
        let count_before = transactions.len();

        transactions.retain(|transaction| transaction.id != id);

        if transactions.len() == count_before {
            return Ok(false);
        }

        self.write_transactions(&transactions, None)?;

        Ok(true)
    }

    fn read_entries(&self) -> Result<Map<String, Value>, Error> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(local_store_error(&self.path, error)),
        };

        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&text).map_err(|error| local_store_error(&self.path, error))
    }

    /// Get every stored transaction, failing if the store cannot be read.
    ///
    /// A missing file holds no transactions.
    ///
    /// # Errors
    /// Returns [Error::LocalStoreError] if the file cannot be read or does
    /// not contain a valid transaction list.
    pub fn try_get_transactions(&self) -> Result<Vec<Transaction>, Error> {
        match self.read_entries()?.remove(TRANSACTIONS_KEY) {
            Some(value) => {
                serde_json::from_value(value).map_err(|error| local_store_error(&self.path, error))
            }
            None => Ok(Vec::new()),
        }
    }

    fn write_transactions(
        &self,
        transactions: &[Transaction],
        next_id: Option<TransactionId>,
    ) -> Result<(), Error> {
        let mut entries = self.read_entries()?;
        let value = serde_json::to_value(transactions)
            .map_err(|error| local_store_error(&self.path, error))?;
        entries.insert(TRANSACTIONS_KEY.to_owned(), value);

        if let Some(next_id) = next_id {
            entries.insert(NEXT_ID_KEY.to_owned(), Value::from(next_id));
        }

        let text = serde_json::to_string_pretty(&entries)
            .map_err(|error| local_store_error(&self.path, error))?;

        fs::write(&self.path, text).map_err(|error| local_store_error(&self.path, error))
    }
}

fn local_store_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::LocalStoreError(format!("{}: {error}", path.display()))
}
