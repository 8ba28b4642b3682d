//! Database query helpers for listing transactions.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error, UserID,
    database_id::CategoryID,
    pagination::Page,
    transaction::domain::{TRANSACTION_COLUMNS, Transaction, map_transaction_row},
};

/// Narrows down which transactions are listed. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions in this category.
    pub category_id: Option<CategoryID>,
    /// Only include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    pub end_date: Option<Date>,
}

impl TransactionFilter {
    /// Build the WHERE clause and its parameters for `user_id` and this filter.
    fn where_clause(&self, user_id: UserID) -> (String, Vec<Value>) {
        let mut conditions = vec!["\"transaction\".user_id = ?".to_owned()];
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(category_id) = self.category_id {
            conditions.push("\"transaction\".category_id = ?".to_owned());
            params.push(Value::Integer(category_id));
        }

        if let Some(start_date) = self.start_date {
            conditions.push("\"transaction\".date >= ?".to_owned());
            params.push(Value::Text(start_date.to_string()));
        }

        if let Some(end_date) = self.end_date {
            conditions.push("\"transaction\".date <= ?".to_owned());
            params.push(Value::Text(end_date.to_string()));
        }

        (format!("WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Count the transactions of `user_id` that match `filter`.
pub fn count_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let (where_clause, params) = filter.where_clause(user_id);
    let query = format!("SELECT COUNT(*) FROM \"transaction\" {where_clause}");

    let count: i64 = connection
        .prepare(&query)?
        .query_row(params_from_iter(params), |row| row.get(0))?;

    Ok(count.try_into().unwrap_or(0))
}

/// Get one page of the transactions of `user_id` that match `filter`.
///
/// Transactions are sorted by date, newest first, and then by ID to keep the
/// order stable for transactions on the same day.
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, mut params) = filter.where_clause(user_id);
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
         INNER JOIN category ON \"transaction\".category_id = category.id \
         {where_clause} \
         ORDER BY \"transaction\".date DESC, \"transaction\".id DESC \
         LIMIT ? OFFSET ?"
    );

    params.push(Value::Integer(page.limit.try_into().unwrap_or(i64::MAX)));
    params.push(Value::Integer(page.offset().try_into().unwrap_or(i64::MAX)));

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}
