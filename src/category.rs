//! The closed set of spending categories.

use std::{fmt::Display, str::FromStr};

use axum::Json;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// What a transaction or budget is for, e.g. "Food" or "Bills".
///
/// Categories are used as aggregation keys, so they are a closed enumeration
/// rather than free text: a typo is rejected instead of silently creating a
/// new bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, eating out.
    Food,
    /// Public transport, fuel, taxis.
    Transport,
    /// Clothes, electronics and other purchases.
    Shopping,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in the order they are offered to users.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    /// The canonical name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .ok_or_else(|| Error::InvalidCategory(name.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A route handler listing every category.
pub async fn get_categories_endpoint() -> Json<[Category; 5]> {
    Json(Category::ALL)
}
