//! Calendar months in the `YYYY-MM` format used by budgets and reports.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use time::{Date, Month};

use crate::Error;

/// A validated calendar month, e.g. "2024-06".
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    // Kept as 1-12 so the derived ordering is chronological.
    month: u8,
}

impl YearMonth {
    /// Create a month from a year and a calendar month.
    pub const fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month: month as u8,
        }
    }

    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month.
    pub fn month(&self) -> Month {
        // `month` is always in 1..=12, see `new` and `from_str`.
        Month::try_from(self.month).unwrap_or(Month::January)
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        Self::of(date) == *self
    }

    /// The first day of the month.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the year is outside the range `time` supports.
    pub fn first_day(&self) -> Result<Date, Error> {
        Date::from_calendar_date(self.year, self.month(), 1)
            .map_err(|_| Error::InvalidMonth(self.to_string()))
    }

    /// The first day of the following month.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the year is outside the range `time` supports.
    pub fn first_day_of_next_month(&self) -> Result<Date, Error> {
        let (year, month) = match self.month() {
            Month::December => (self.year + 1, Month::January),
            month => (self.year, month.next()),
        };

        Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidMonth(self.to_string()))
    }

    /// Parse a required month query parameter.
    ///
    /// # Errors
    /// Returns [Error::MissingMonth] if the parameter is absent or blank, or
    /// [Error::InvalidMonth] if it is not in the format `YYYY-MM`.
    pub fn from_param(param: Option<&str>) -> Result<Self, Error> {
        match param.map(str::trim) {
            None | Some("") => Err(Error::MissingMonth),
            Some(month) => month.parse(),
        }
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse a month in the format `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::new(year, month))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

impl ToSql for YearMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for YearMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}
