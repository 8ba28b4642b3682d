//! The request body for creating and editing transactions.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::CategoryID,
    transaction::domain::{NewTransaction, TransactionUpdate, parse_date},
};

/// The JSON body for creating or editing a transaction.
///
/// Every field is optional so that missing, null, zero and empty values can
/// be treated alike: when creating they are missing, when editing they are
/// left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The ID of a category owned by the user.
    #[serde(default)]
    pub category_id: Option<CategoryID>,
    /// The value of the transaction in dollars.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// The date when the transaction occurred, e.g. "2024-01-15".
    #[serde(default)]
    pub date: Option<String>,
}

impl TransactionForm {
    fn category_id(&self) -> Option<CategoryID> {
        self.category_id.filter(|&id| id != 0)
    }

    fn amount(&self) -> Option<f64> {
        self.amount.filter(|&amount| amount != 0.0)
    }

    fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|date| !date.trim().is_empty())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|description| !description.is_empty())
    }

    /// Validate the form for creating a transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] if the category, amount or date is
    /// missing, or [Error::InvalidDate] if the date cannot be parsed.
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let (Some(category_id), Some(amount), Some(raw_date)) =
            (self.category_id(), self.amount(), self.date())
        else {
            return Err(Error::MissingFields(
                "Category, amount, and date are required",
            ));
        };

        Ok(NewTransaction {
            category_id,
            amount,
            date: parse_date(raw_date)?,
            description: self.description().unwrap_or_default().to_owned(),
        })
    }

    /// Validate the form for editing a transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if a date is given and cannot be parsed.
    pub fn into_update(self) -> Result<TransactionUpdate, Error> {
        Ok(TransactionUpdate {
            category_id: self.category_id(),
            amount: self.amount(),
            description: self.description().map(str::to_owned),
            date: self.date().map(parse_date).transpose()?,
        })
    }
}

#[cfg(test)]
mod transaction_form_tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{NewTransaction, TransactionUpdate},
    };

    use super::TransactionForm;

    #[test]
    fn new_transaction_from_complete_form() {
        let form = TransactionForm {
            category_id: Some(3),
            amount: Some(-12.5),
            description: None,
            date: Some("2024-01-15".to_owned()),
        };

        assert_eq!(
            form.into_new_transaction(),
            Ok(NewTransaction {
                category_id: 3,
                amount: -12.5,
                description: String::new(),
                date: date!(2024 - 01 - 15),
            })
        );
    }

    #[test]
    fn new_transaction_treats_zero_as_missing() {
        let form = TransactionForm {
            category_id: Some(3),
            amount: Some(0.0),
            description: None,
            date: Some("2024-01-15".to_owned()),
        };

        assert_eq!(
            form.into_new_transaction(),
            Err(Error::MissingFields(
                "Category, amount, and date are required"
            ))
        );
    }

    #[test]
    fn new_transaction_rejects_bad_date() {
        let form = TransactionForm {
            category_id: Some(3),
            amount: Some(1.0),
            description: None,
            date: Some("15-01-2024".to_owned()),
        };

        assert_eq!(form.into_new_transaction(), Err(Error::InvalidDate));
    }

    #[test]
    fn update_skips_empty_fields() {
        let form = TransactionForm {
            category_id: Some(0),
            amount: None,
            description: Some(String::new()),
            date: Some("2024-02-29".to_owned()),
        };

        assert_eq!(
            form.into_update(),
            Ok(TransactionUpdate {
                date: Some(date!(2024 - 02 - 29)),
                ..Default::default()
            })
        );
    }
}
