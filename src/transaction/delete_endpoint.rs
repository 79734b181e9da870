//! The endpoint for deleting a transaction by its ID.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::DatabaseState,
    transaction::{core::delete_transaction, payload::DeleteTransactionPayload},
};

/// The body of the response to a delete request.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether a transaction was deleted.
    pub success: bool,
}

/// A route handler for deleting a transaction.
///
/// Deleting a transaction that does not exist is not an error, the response
/// reports `success: false` and nothing is changed.
pub async fn delete_transaction_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<DeleteTransactionPayload>, JsonRejection>,
) -> Response {
    let transaction_id = match payload {
        Ok(Json(DeleteTransactionPayload { id: Some(id) })) => id,
        Ok(_) => return Error::MissingId.into_response(),
        Err(rejection) => return Error::InvalidJson(rejection.body_text()).into_response(),
    };

    let connection = match state.connection() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(success) => {
            if !success {
                tracing::warn!("Tried to delete transaction {transaction_id} which does not exist");
            }

            Json(DeleteResponse { success }).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, body::to_bytes, extract::State, http::StatusCode};
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        app_state::must_create_test_state,
        category::Category,
        transaction::{
            Transaction, count_transactions, create_transaction,
            delete_endpoint::{DeleteResponse, delete_transaction_endpoint},
            get_transaction,
            payload::DeleteTransactionPayload,
        },
    };

    async fn parse_body(response: axum::response::Response) -> DeleteResponse {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let state = must_create_test_state();
        let transaction = create_transaction(
            Transaction::build(dec!(1.23), date!(2025 - 10 - 26), "Test", Category::Other),
            datetime!(2025-10-26 10:00 UTC),
            &state.connection().unwrap(),
        )
        .unwrap();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Ok(Json(DeleteTransactionPayload {
                id: Some(transaction.id),
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(parse_body(response).await, DeleteResponse { success: true });
        assert_eq!(
            get_transaction(transaction.id, &state.connection().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn unknown_id_reports_failure() {
        let state = must_create_test_state();
        create_transaction(
            Transaction::build(dec!(1.23), date!(2025 - 10 - 26), "Test", Category::Other),
            datetime!(2025-10-26 10:00 UTC),
            &state.connection().unwrap(),
        )
        .unwrap();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Ok(Json(DeleteTransactionPayload { id: Some(999) })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(parse_body(response).await, DeleteResponse { success: false });
        assert_eq!(count_transactions(&state.connection().unwrap()), Ok(1));
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let state = must_create_test_state();

        let response = delete_transaction_endpoint(
            State(state),
            Ok(Json(DeleteTransactionPayload { id: None })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
