//! The endpoint for replacing the contents of an existing transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Error,
    app_state::DatabaseState,
    transaction::{core::update_transaction, payload::EditTransactionPayload},
};

/// A route handler for replacing the contents of a transaction, responds with
/// the updated transaction.
pub async fn edit_transaction_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<EditTransactionPayload>, JsonRejection>,
) -> Response {
    let (transaction_id, builder) = match payload
        .map_err(|rejection| Error::InvalidJson(rejection.body_text()))
        .and_then(|Json(payload)| payload.into_parts())
    {
        Ok(parts) => parts,
        Err(error) => {
            tracing::debug!("rejected transaction update: {error}");
            return error.into_response();
        }
    };

    let connection = match state.connection() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match update_transaction(
        transaction_id,
        builder,
        OffsetDateTime::now_utc(),
        &connection,
    ) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(Error::UpdateMissingTransaction) => {
            tracing::warn!("Could not update transaction {transaction_id}: not found");
            Error::UpdateMissingTransaction.into_response()
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod test {
    use axum::{Json, extract::State, http::StatusCode};
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    use crate::{
        app_state::must_create_test_state,
        category::Category,
        transaction::{
            Transaction, TransactionType, create_transaction,
            edit_endpoint::edit_transaction_endpoint, get_transaction,
            payload::EditTransactionPayload,
        },
    };

    #[tokio::test]
    async fn can_update_transaction() {
        let state = must_create_test_state();
        let created_at = datetime!(2025-10-27 10:00 UTC);
        create_transaction(
            Transaction::build(dec!(1.23), date!(2025 - 10 - 27), "test", Category::Food),
            created_at,
            &state.connection().unwrap(),
        )
        .expect("could not create test transaction");
        let payload = EditTransactionPayload {
            id: Some(1),
            amount: Some(dec!(3.21)),
            date: Some(date!(2025 - 10 - 28)),
            description: Some("foo".to_owned()),
            category: Some("Bills".to_owned()),
            transaction_type: Some(TransactionType::Income),
        };

        let response = edit_transaction_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let got = get_transaction(1, &state.connection().unwrap())
            .expect("could not get test transaction");
        assert_eq!(got.amount, dec!(3.21));
        assert_eq!(got.date, date!(2025 - 10 - 28));
        assert_eq!(got.description, "foo");
        assert_eq!(got.category, Category::Bills);
        assert_eq!(got.transaction_type, TransactionType::Income);
        assert_eq!(got.created_at, created_at);
        assert!(got.updated_at > created_at);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = must_create_test_state();
        let payload = EditTransactionPayload {
            id: Some(42),
            amount: Some(dec!(3.21)),
            date: Some(date!(2025 - 10 - 28)),
            description: Some("foo".to_owned()),
            category: Some("Bills".to_owned()),
            transaction_type: None,
        };

        let response = edit_transaction_endpoint(State(state), Ok(Json(payload))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let state = must_create_test_state();
        let payload = EditTransactionPayload {
            id: None,
            amount: Some(dec!(3.21)),
            date: Some(date!(2025 - 10 - 28)),
            description: Some("foo".to_owned()),
            category: Some("Bills".to_owned()),
            transaction_type: None,
        };

        let response = edit_transaction_endpoint(State(state), Ok(Json(payload))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
