//! Route handlers for the spending insights and summary reports.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::DatabaseState,
    budget::{Budget, get_budgets_for_month},
    category::Category,
    insights::{
        aggregation::{
            CategoryTotal, CategoryTotals, category_totals, compare_budgets, top_categories,
        },
        summary::{Summary, summarize},
        tip::{Tip, select_tip},
    },
    month::YearMonth,
    transaction::{get_all_transactions, get_transactions_in_month},
};

/// How many categories to list as top spending when the request doesn't say.
pub const DEFAULT_TOP_CATEGORIES: usize = 2;

/// Query parameters for the insights report, e.g. `?month=2024-06&top=3`.
#[derive(Debug, Default, Deserialize)]
pub struct InsightsQuery {
    /// The month as `YYYY-MM`.
    pub month: Option<String>,
    /// How many top spending categories to include.
    pub top: Option<usize>,
}

/// Spending against budgets for one month.
#[derive(Debug, Serialize)]
pub struct Insights {
    /// The month that the report is for.
    pub month: YearMonth,
    /// Total expenses per category.
    pub category_totals: CategoryTotals,
    /// The categories with the highest spending, highest first.
    pub top_categories: Vec<CategoryTotal>,
    /// The budgets set for `month`.
    pub budgets: Vec<Budget>,
    /// Budgeted categories where spending exceeded the budget.
    pub over_budget: Vec<Category>,
    /// Budgeted categories where spending was below the budget.
    pub under_budget: Vec<Category>,
    /// Advice based on the above.
    pub tip: Tip,
}

/// A route handler for the spending insights for a month.
pub async fn get_insights_endpoint(
    State(state): State<DatabaseState>,
    query: Result<Query<InsightsQuery>, QueryRejection>,
) -> Result<Json<Insights>, Error> {
    let Query(query) = query?;
    let month = YearMonth::from_param(query.month.as_deref())?;
    let top = query.top.unwrap_or(DEFAULT_TOP_CATEGORIES);

    let (transactions, budgets) = {
        let connection = state.connection()?;
        (
            get_transactions_in_month(month, &connection)?,
            get_budgets_for_month(month, &connection)?,
        )
    };

    let totals = category_totals(&transactions, month);
    let comparison = compare_budgets(&totals, &budgets);
    let tip = select_tip(&comparison, !budgets.is_empty());

    Ok(Json(Insights {
        month,
        top_categories: top_categories(&totals, top),
        category_totals: totals,
        budgets,
        over_budget: comparison.over_budget,
        under_budget: comparison.under_budget,
        tip,
    }))
}

/// A route handler for the all-time totals.
pub async fn get_summary_endpoint(
    State(state): State<DatabaseState>,
) -> Result<Json<Summary>, Error> {
    let transactions = {
        let connection = state.connection()?;
        get_all_transactions(&connection)?
    };

    Ok(Json(summarize(&transactions)))
}

#[cfg(test)]
mod tests {
    use axum::extract::{Query, State, rejection::QueryRejection};
    use rust_decimal_macros::dec;
    use time::{
        Month,
        macros::{date, datetime},
    };

    use crate::{
        Error,
        app_state::{DatabaseState, must_create_test_state},
        budget::upsert_budget,
        category::Category,
        insights::{
            handlers::{InsightsQuery, get_insights_endpoint, get_summary_endpoint},
            tip::Tip,
        },
        month::YearMonth,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    const JUNE: YearMonth = YearMonth::new(2024, Month::June);

    fn june_query() -> Result<Query<InsightsQuery>, QueryRejection> {
        Ok(Query(InsightsQuery {
            month: Some("2024-06".to_owned()),
            top: None,
        }))
    }

    fn seed_transactions(state: &DatabaseState) {
        let connection = state.connection().unwrap();
        let now = datetime!(2024-06-20 09:00 UTC);
        for builder in [
            Transaction::build(dec!(50), date!(2024 - 06 - 01), "groceries", Category::Food),
            Transaction::build(dec!(30), date!(2024 - 06 - 15), "takeaway", Category::Food),
            Transaction::build(dec!(100), date!(2024 - 06 - 10), "refund", Category::Food)
                .transaction_type(Some(TransactionType::Income)),
            Transaction::build(dec!(12), date!(2024 - 06 - 11), "bus", Category::Transport),
            Transaction::build(dec!(999), date!(2024 - 07 - 01), "rent", Category::Bills),
        ] {
            create_transaction(builder, now, &connection).unwrap();
        }
    }

    #[tokio::test]
    async fn insights_total_expenses_for_month() {
        let state = must_create_test_state();
        seed_transactions(&state);

        let insights = get_insights_endpoint(State(state), june_query())
            .await
            .unwrap()
            .0;

        assert_eq!(insights.month, JUNE);
        assert_eq!(insights.category_totals.get(Category::Food), Some(dec!(80)));
        assert_eq!(
            insights.category_totals.get(Category::Transport),
            Some(dec!(12))
        );
        assert_eq!(insights.category_totals.get(Category::Bills), None);
        assert_eq!(insights.tip, Tip::SetBudgets);
    }

    #[tokio::test]
    async fn insights_report_over_budget() {
        let state = must_create_test_state();
        seed_transactions(&state);
        upsert_budget(Category::Food, JUNE, dec!(50), &state.connection().unwrap()).unwrap();

        let insights = get_insights_endpoint(State(state), june_query())
            .await
            .unwrap()
            .0;

        assert_eq!(insights.over_budget, vec![Category::Food]);
        assert!(insights.under_budget.is_empty());
        assert_eq!(insights.budgets.len(), 1);
        assert_eq!(insights.tip, Tip::OverBudget(vec![Category::Food]));
    }

    #[tokio::test]
    async fn insights_limit_top_categories() {
        let state = must_create_test_state();
        seed_transactions(&state);

        let insights = get_insights_endpoint(
            State(state),
            Ok(Query(InsightsQuery {
                month: Some("2024-06".to_owned()),
                top: Some(1),
            })),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(insights.top_categories.len(), 1);
        assert_eq!(insights.top_categories[0].category, Category::Food);
    }

    #[tokio::test]
    async fn insights_require_valid_month() {
        let state = must_create_test_state();

        let missing =
            get_insights_endpoint(State(state.clone()), Ok(Query(InsightsQuery::default()))).await;
        let malformed = get_insights_endpoint(
            State(state),
            Ok(Query(InsightsQuery {
                month: Some("2024-6".to_owned()),
                top: None,
            })),
        )
        .await;

        assert_eq!(missing.map(|json| json.0.month).err(), Some(Error::MissingMonth));
        assert_eq!(
            malformed.map(|json| json.0.month).err(),
            Some(Error::InvalidMonth("2024-6".to_owned()))
        );
    }

    #[tokio::test]
    async fn summary_covers_all_months() {
        let state = must_create_test_state();
        seed_transactions(&state);

        let summary = get_summary_endpoint(State(state)).await.unwrap().0;

        assert_eq!(summary.total_income, dec!(100));
        assert_eq!(summary.total_expenses, dec!(1091));
        assert_eq!(summary.balance, dec!(-991));
        assert_eq!(summary.monthly_expenses.len(), 2);
    }
}
