//! Application router configuration.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState,
    budget::{get_budgets_endpoint, set_budget_endpoint},
    category::get_categories_endpoint,
    endpoints,
    insights::{get_insights_endpoint, get_summary_endpoint},
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint)
                .post(create_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route(
            endpoints::BUDGETS_API,
            get(get_budgets_endpoint).post(set_budget_endpoint),
        )
        .route(endpoints::INSIGHTS_API, get(get_insights_endpoint))
        .route(endpoints::SUMMARY_API, get(get_summary_endpoint))
        .route(endpoints::CATEGORIES_API, get(get_categories_endpoint))
        .route(endpoints::HEALTH, get(get_health))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Report that the server is up.
async fn get_health() -> &'static str {
    "OK"
}
