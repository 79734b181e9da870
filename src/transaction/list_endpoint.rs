//! Endpoints for reading transactions.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    app_state::DatabaseState,
    database_id::TransactionId,
    transaction::{
        Transaction,
        core::{get_all_transactions, get_transaction},
    },
};

/// A route handler for listing every transaction, most recent first.
pub async fn get_transactions_endpoint(
    State(state): State<DatabaseState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.connection()?;

    get_all_transactions(&connection).map(Json).inspect_err(|error| {
        tracing::error!("Could not get transactions: {error}");
    })
}

/// A route handler for getting a single transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<DatabaseState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = transaction_id?;
    let connection = state.connection()?;

    get_transaction(transaction_id, &connection).map(Json)
}
