//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Error,
    app_state::DatabaseState,
    transaction::{core::create_transaction, payload::TransactionPayload},
};

/// A route handler for creating a new transaction, responds with the created
/// transaction and 201 Created on success.
pub async fn create_transaction_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let builder = match payload
        .map_err(|rejection| Error::InvalidJson(rejection.body_text()))
        .and_then(|Json(payload)| payload.into_builder())
    {
        Ok(builder) => builder,
        Err(error) => {
            tracing::debug!("rejected new transaction: {error}");
            return error.into_response();
        }
    };

    let connection = match state.connection() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_transaction(builder, OffsetDateTime::now_utc(), &connection) {
        Ok(transaction) => {
            tracing::info!("created transaction {}", transaction.id);
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode};
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        app_state::must_create_test_state,
        category::Category,
        transaction::{
            Transaction, TransactionType, count_transactions,
            create_endpoint::create_transaction_endpoint, get_transaction,
            payload::TransactionPayload,
        },
    };

    #[tokio::test]
    async fn can_create_transaction() {
        let state = must_create_test_state();
        let payload = TransactionPayload {
            amount: Some(dec!(12.3)),
            date: Some(date!(2025 - 10 - 05)),
            description: Some("test transaction".to_owned()),
            category: Some("Food".to_owned()),
            transaction_type: None,
        };

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let connection = state.connection().unwrap();
        let got = get_transaction(1, &connection).expect("could not get created transaction");
        assert_eq!(got.amount, dec!(12.3));
        assert_eq!(got.category, Category::Food);
        assert_eq!(got.transaction_type, TransactionType::Expense);
    }

    #[tokio::test]
    async fn missing_field_is_bad_request_and_creates_nothing() {
        let state = must_create_test_state();
        let payload = TransactionPayload {
            amount: Some(dec!(12.3)),
            date: Some(date!(2025 - 10 - 05)),
            description: None,
            category: Some("Food".to_owned()),
            transaction_type: None,
        };

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_transactions(&state.connection().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn zero_amount_is_bad_request() {
        let state = must_create_test_state();
        let payload = TransactionPayload {
            amount: Some(dec!(0)),
            date: Some(date!(2025 - 10 - 05)),
            description: Some("Nothing".to_owned()),
            category: Some("Other".to_owned()),
            transaction_type: None,
        };

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_transactions(&state.connection().unwrap()), Ok(0));
    }

    #[test]
    fn created_transaction_serializes_with_camel_case_fields() {
        let transaction = Transaction {
            id: 1,
            amount: dec!(50),
            date: date!(2024 - 06 - 01),
            description: "Groceries".to_owned(),
            category: Category::Food,
            transaction_type: TransactionType::Expense,
            created_at: time::macros::datetime!(2024-06-01 12:00 UTC),
            updated_at: time::macros::datetime!(2024-06-01 12:00 UTC),
        };

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["category"], "Food");
        assert_eq!(json["createdAt"], "2024-06-01T12:00:00Z");
        assert_eq!(json["amount"], 50.0);
    }
}
