//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error, UserID,
    category::{Category, get_category, map_category_row},
    database_id::{CategoryID, TransactionID},
};

/// The date format used in requests, responses and the database, e.g. "2024-01-15".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");

/// Parse a date in the format "YYYY-MM-DD".
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `raw` is not a valid calendar date in that format.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate)
}

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Whether the transaction counts as income or an expense is decided by the
/// type of its category, not the sign of the amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionID,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryID,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// The category the transaction belongs to.
    pub category: Category,
}

/// The validated data for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub category_id: CategoryID,
    pub amount: f64,
    pub description: String,
    pub date: Date,
}

/// The fields of a transaction to change. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub category_id: Option<CategoryID>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<Date>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns to select for [map_transaction_row], with the category joined in.
pub(crate) const TRANSACTION_COLUMNS: &str = "\"transaction\".id, \"transaction\".user_id, \
    \"transaction\".category_id, \"transaction\".amount, \"transaction\".description, \
    \"transaction\".date, \"transaction\".created_at, \"transaction\".updated_at, \
    category.id, category.user_id, category.name, category.type, category.created_at, \
    category.updated_at";

/// Map a row selected with [TRANSACTION_COLUMNS] to a [Transaction].
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        category: map_category_row(row, 8)?,
    })
}

/// Initialize the transaction table and indexes.
///
/// A category cannot be deleted while a transaction refers to it.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Create a transaction for `user_id` and return it with its category.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not belong to `user_id`.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category = get_category(new_transaction.category_id, user_id, connection)?;
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\" (user_id, category_id, amount, description, date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        (
            user_id.as_i64(),
            category.id,
            new_transaction.amount,
            &new_transaction.description,
            new_transaction.date,
            now,
        ),
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        user_id,
        category_id: category.id,
        amount: new_transaction.amount,
        description: new_transaction.description,
        date: new_transaction.date,
        created_at: now,
        updated_at: now,
        category,
    })
}

/// Retrieve the transaction with `transaction_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if the transaction does not exist or
/// belongs to another user.
pub fn get_transaction(
    transaction_id: TransactionID,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
         INNER JOIN category ON \"transaction\".category_id = category.id \
         WHERE \"transaction\".id = ?1 AND \"transaction\".user_id = ?2"
    );

    connection
        .prepare(&query)?
        .query_row((transaction_id, user_id.as_i64()), map_transaction_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::TransactionNotFound,
            error => error,
        })
}

/// Apply `update` to the transaction with `transaction_id` owned by `user_id`.
///
/// Returns the transaction as it is after the update.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if the transaction does not belong to
/// `user_id`, or [Error::CategoryNotFound] if the new category does not.
pub fn update_transaction(
    transaction_id: TransactionID,
    user_id: UserID,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    get_transaction(transaction_id, user_id, connection)?;

    if let Some(category_id) = update.category_id {
        get_category(category_id, user_id, connection)?;
    }

    connection.execute(
        "UPDATE \"transaction\"
         SET category_id = COALESCE(?1, category_id),
             amount = COALESCE(?2, amount),
             description = COALESCE(?3, description),
             date = COALESCE(?4, date),
             updated_at = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            update.category_id,
            update.amount,
            update.description,
            update.date,
            OffsetDateTime::now_utc(),
            transaction_id,
            user_id.as_i64(),
        ),
    )?;

    get_transaction(transaction_id, user_id, connection)
}

/// Delete the transaction with `transaction_id` owned by `user_id`.
pub fn delete_transaction(
    transaction_id: TransactionID,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}
