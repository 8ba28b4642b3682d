//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, UserID, database_id::CategoryID};

/// Whether the transactions in a category add to or take away from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl CategoryType {
    /// The lowercase name used in requests and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            _ => Err(Error::InvalidCategoryType),
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for CategoryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A named group of transactions owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category in the database.
    pub id: CategoryID,
    /// The user that owns the category.
    pub user_id: UserID,
    /// The display name, e.g. "Groceries".
    pub name: String,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The fields of a category to change. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new category type.
    pub category_type: Option<CategoryType>,
}

/// Form data for category creation and editing.
///
/// Missing fields deserialize to empty strings so the handlers can respond
/// with a meaningful error message.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The display name of the category.
    #[serde(default)]
    pub name: String,
    /// Either "income" or "expense".
    #[serde(default, rename = "type")]
    pub category_type: String,
}

#[cfg(test)]
mod category_type_tests {
    use crate::{CategoryType, Error};

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("income".parse(), Ok(CategoryType::Income));
        assert_eq!("expense".parse(), Ok(CategoryType::Expense));
    }

    #[test]
    fn rejects_other_names() {
        assert_eq!(
            "Income".parse::<CategoryType>(),
            Err(Error::InvalidCategoryType)
        );
        assert_eq!(
            "savings".parse::<CategoryType>(),
            Err(Error::InvalidCategoryType)
        );
    }

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&CategoryType::Expense).unwrap(),
            "\"expense\""
        );
    }
}
