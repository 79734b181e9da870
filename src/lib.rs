//! A web service for tracking personal income, expenses and monthly budgets.
//!
//! This library provides a JSON REST API for recording transactions, setting
//! per-category budgets and reporting spending against those budgets.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod budget;
mod category;
mod database_id;
mod db;
mod endpoints;
mod insights;
mod local_store;
mod logging;
mod month;
mod not_found;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use budget::{Budget, count_budgets, get_budgets_for_month, upsert_budget};
pub use category::Category;
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use db::{MAX_AMOUNT, initialize as initialize_db};
pub use insights::{
    BudgetComparison, CategoryTotal, CategoryTotals, MonthlyTotal, Summary, Tip,
    category_totals, compare_budgets, select_tip, summarize, top_categories,
};
pub use local_store::{LocalStore, TRANSACTIONS_KEY};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::YearMonth;
pub use routing::build_router;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionType, count_transactions, create_transaction,
    delete_transaction, get_all_transactions, get_transaction, get_transactions_in_month,
    import_transactions, update_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or empty in the request body.
    #[error("All fields are required.")]
    MissingFields,

    /// The request body did not include the ID of the record to act on.
    #[error("ID required.")]
    MissingId,

    /// The request did not specify which month to report on.
    #[error("Month required.")]
    MissingMonth,

    /// A month string was not in the format `YYYY-MM`.
    #[error("\"{0}\" is not a valid month, expected the format YYYY-MM")]
    InvalidMonth(String),

    /// A category name did not match any known category.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A transaction amount was zero or negative.
    ///
    /// Whether money was spent or earned is recorded by the transaction type,
    /// so the amount itself must always be greater than zero.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    /// A transaction or budget amount was more than [MAX_AMOUNT].
    #[error("the amount must not be more than {}", MAX_AMOUNT)]
    AmountTooLarge,

    /// A budget amount was negative.
    #[error("the budget amount must not be negative")]
    NegativeBudget,

    /// The request body could not be parsed as the expected JSON.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// The query string or a path segment could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body was larger than the server will accept.
    #[error("the request body is too large")]
    PayloadTooLarge,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist.
    #[error("Transaction not found.")]
    UpdateMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The local store file could not be read, parsed or written.
    #[error("local store error: {0}")]
    LocalStoreError(String),

    /// A response body could not be read back for logging.
    #[error("could not read the response body: {0}")]
    ResponseBodyError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields
            | Error::MissingId
            | Error::MissingMonth
            | Error::InvalidMonth(_)
            | Error::InvalidCategory(_)
            | Error::NonPositiveAmount
            | Error::AmountTooLarge
            | Error::NegativeBudget
            | Error::InvalidJson(_)
            | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UpdateMissingTransaction => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::LocalStoreError(_)
            | Error::ResponseBodyError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
