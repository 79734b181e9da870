//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// The route to list, create, update and delete transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to get a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and set the budgets for a month.
pub const BUDGETS_API: &str = "/api/budgets";
/// The route for spending against budgets in a month.
pub const INSIGHTS_API: &str = "/api/insights";
/// The route for all-time income, expense and balance totals.
pub const SUMMARY_API: &str = "/api/summary";
/// The route listing the transaction categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{transaction_id}' in '/api/transactions/{transaction_id}'.
///
/// Only the first parameter is replaced. If no parameter is found, the
/// original `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}
