//! Database setup and helpers shared by the route handlers.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, ErrorCode, ffi};

use crate::{
    Error, auth::create_user_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection`, which SQLite
/// leaves off by default.
///
/// # Errors
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;
    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    transaction.commit()?;

    Ok(())
}

/// Whether `error` is a failed FOREIGN KEY constraint.
///
/// SQLite reports a failed insert or update as extended code 787, and a
/// delete blocked by `ON DELETE RESTRICT` as extended code 1811.
pub fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, _) => {
            sql_error.code == ErrorCode::ConstraintViolation
                && matches!(
                    sql_error.extended_code,
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY | ffi::SQLITE_CONSTRAINT_TRIGGER
                )
        }
        _ => false,
    }
}

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
