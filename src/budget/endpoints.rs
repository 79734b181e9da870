//! Route handlers for reading and setting budgets.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    Error,
    app_state::DatabaseState,
    budget::{Budget, get_budgets_for_month, upsert_budget},
    category::Category,
    month::YearMonth,
};

/// Query parameters selecting a month, e.g. `?month=2024-06`.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month as `YYYY-MM`.
    pub month: Option<String>,
}

impl MonthQuery {
    /// Parse the month parameter.
    ///
    /// # Errors
    /// Returns [Error::MissingMonth] if the parameter is absent or blank, or
    /// [Error::InvalidMonth] if it is not in the format `YYYY-MM`.
    pub fn parse_month(&self) -> Result<YearMonth, Error> {
        YearMonth::from_param(self.month.as_deref())
    }
}

/// A route handler for listing the budgets for a month.
///
/// Each budget carries its month, so clients can drop a response that arrives
/// after they have moved on to another month.
pub async fn get_budgets_endpoint(
    State(state): State<DatabaseState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<Budget>>, Error> {
    let Query(query) = query?;
    let month = query.parse_month()?;
    let connection = state.connection()?;

    get_budgets_for_month(month, &connection).map(Json)
}

/// The body of a request to set a budget.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetPayload {
    pub category: Option<String>,
    pub month: Option<String>,
    pub amount: Option<Decimal>,
}

impl BudgetPayload {
    fn into_parts(self) -> Result<(Category, YearMonth, Decimal), Error> {
        let (Some(category), Some(month), Some(amount)) = (self.category, self.month, self.amount)
        else {
            return Err(Error::MissingFields);
        };

        if category.trim().is_empty() || month.trim().is_empty() {
            return Err(Error::MissingFields);
        }

        Ok((category.parse()?, month.parse()?, amount))
    }
}

/// A route handler for setting the budget for a category and month.
///
/// Setting a budget that already exists overwrites its amount. Responds with
/// the stored budget and 201 Created.
pub async fn set_budget_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<BudgetPayload>, JsonRejection>,
) -> Response {
    let (category, month, amount) = match payload
        .map_err(|rejection| Error::InvalidJson(rejection.body_text()))
        .and_then(|Json(payload)| payload.into_parts())
    {
        Ok(parts) => parts,
        Err(error) => {
            tracing::debug!("rejected budget: {error}");
            return error.into_response();
        }
    };

    let connection = match state.connection() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match upsert_budget(category, month, amount, &connection) {
        Ok(budget) => {
            tracing::info!("set {category} budget for {month} to {amount}");
            (StatusCode::CREATED, Json(budget)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not set {category} budget for {month}: {error}");
            error.into_response()
        }
    }
}
