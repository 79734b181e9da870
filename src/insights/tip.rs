//! The advisory tip shown alongside the spending insights.

use std::fmt::Display;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{category::Category, insights::aggregation::BudgetComparison};

/// A single piece of advice about the month's spending.
#[derive(Debug, Clone, PartialEq)]
pub enum Tip {
    /// At least one category is over budget.
    OverBudget(Vec<Category>),
    /// Nothing is over budget and at least one category is under budget.
    UnderBudget(Vec<Category>),
    /// Budgets are set and every one of them is exactly met.
    OnTrack,
    /// No budgets are set for the month.
    SetBudgets,
}

impl Tip {
    /// A short machine-readable name for the kind of tip.
    pub fn kind(&self) -> &'static str {
        match self {
            Tip::OverBudget(_) => "over_budget",
            Tip::UnderBudget(_) => "under_budget",
            Tip::OnTrack => "on_track",
            Tip::SetBudgets => "set_budgets",
        }
    }
}

fn join(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Display for Tip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tip::OverBudget(categories) => {
                write!(f, "You are over budget in: {}.", join(categories))
            }
            Tip::UnderBudget(categories) => {
                write!(f, "You are under budget in: {}. Great job!", join(categories))
            }
            Tip::OnTrack => f.write_str("You're on track with your budgets!"),
            Tip::SetBudgets => f.write_str("Set budgets for more insights."),
        }
    }
}

impl Serialize for Tip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tip = serializer.serialize_struct("Tip", 2)?;
        tip.serialize_field("kind", self.kind())?;
        tip.serialize_field("message", &self.to_string())?;
        tip.end()
    }
}

/// Pick the single most relevant tip.
///
/// Over-budget categories take priority, then under-budget categories. If
/// neither exist the tip depends on whether any budgets were set.
pub fn select_tip(comparison: &BudgetComparison, has_budgets: bool) -> Tip {
    if !comparison.over_budget.is_empty() {
        Tip::OverBudget(comparison.over_budget.clone())
    } else if !comparison.under_budget.is_empty() {
        Tip::UnderBudget(comparison.under_budget.clone())
    } else if has_budgets {
        Tip::OnTrack
    } else {
        Tip::SetBudgets
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        category::Category,
        insights::{
            aggregation::BudgetComparison,
            tip::{Tip, select_tip},
        },
    };

    #[test]
    fn over_budget_takes_priority() {
        let comparison = BudgetComparison {
            over_budget: vec![Category::Food, Category::Bills],
            under_budget: vec![Category::Transport],
        };

        let tip = select_tip(&comparison, true);

        assert_eq!(tip, Tip::OverBudget(vec![Category::Food, Category::Bills]));
        assert_eq!(tip.to_string(), "You are over budget in: Food, Bills.");
    }

    #[test]
    fn under_budget_when_nothing_is_over() {
        let comparison = BudgetComparison {
            over_budget: vec![],
            under_budget: vec![Category::Transport],
        };

        let tip = select_tip(&comparison, true);

        assert_eq!(
            tip.to_string(),
            "You are under budget in: Transport. Great job!"
        );
    }

    #[test]
    fn on_track_when_budgets_are_met_exactly() {
        let tip = select_tip(&BudgetComparison::default(), true);

        assert_eq!(tip, Tip::OnTrack);
        assert_eq!(tip.to_string(), "You're on track with your budgets!");
    }

    #[test]
    fn prompts_for_budgets_when_none_are_set() {
        let tip = select_tip(&BudgetComparison::default(), false);

        assert_eq!(tip, Tip::SetBudgets);
        assert_eq!(tip.to_string(), "Set budgets for more insights.");
    }

    #[test]
    fn serializes_kind_and_message() {
        let json = serde_json::to_value(Tip::OnTrack).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "on_track",
                "message": "You're on track with your budgets!"
            })
        );
    }
}
