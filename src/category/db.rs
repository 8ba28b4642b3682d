//! Database operations for categories.
//!
//! Every query is scoped to the user that owns the category. A category that
//! belongs to another user is reported as [Error::CategoryNotFound], the same
//! as one that does not exist.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    category::{Category, CategoryType, CategoryUpdate},
    database_id::CategoryID,
    db::is_foreign_key_violation,
};

/// The categories every new user starts with.
pub const DEFAULT_CATEGORIES: [(&str, CategoryType); 8] = [
    ("Salary", CategoryType::Income),
    ("Freelance", CategoryType::Income),
    ("Bonus", CategoryType::Income),
    ("Food", CategoryType::Expense),
    ("Transport", CategoryType::Expense),
    ("Shopping", CategoryType::Expense),
    ("Bills", CategoryType::Expense),
    ("Entertainment", CategoryType::Expense),
];

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if `user_id` does not belong to a registered user.
pub fn create_category(
    user_id: UserID,
    name: &str,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO category (user_id, name, type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            (user_id.as_i64(), name, category_type, now),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::UserNotFound
            } else {
                error.into()
            }
        })?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id,
        name: name.to_owned(),
        category_type,
        created_at: now,
        updated_at: now,
    })
}

/// Insert the [DEFAULT_CATEGORIES] for a newly registered user.
pub fn create_default_categories(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    for (name, category_type) in DEFAULT_CATEGORIES {
        create_category(user_id, name, category_type, connection)?;
    }

    Ok(())
}

/// Retrieve the category with `category_id` owned by `user_id`.
pub fn get_category(
    category_id: CategoryID,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, created_at, updated_at
             FROM category WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            |row| map_category_row(row, 0),
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::CategoryNotFound,
            error => error,
        })
}

/// Retrieve the categories owned by `user_id`, optionally only those of `category_type`.
///
/// Categories are returned in the order they were created.
pub fn get_categories(
    user_id: UserID,
    category_type: Option<CategoryType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, created_at, updated_at
             FROM category
             WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
             ORDER BY id ASC",
        )?
        .query_map((user_id.as_i64(), category_type), |row| {
            map_category_row(row, 0)
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to the category with `category_id` owned by `user_id`.
///
/// Returns the category as it is after the update.
pub fn update_category(
    category_id: CategoryID,
    user_id: UserID,
    update: CategoryUpdate,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category
         SET name = COALESCE(?1, name), type = COALESCE(?2, type), updated_at = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            update.name,
            update.category_type,
            OffsetDateTime::now_utc(),
            category_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    get_category(category_id, user_id, connection)
}

/// Delete the category with `category_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::CategoryInUse] if any transaction refers to the category.
pub fn delete_category(
    category_id: CategoryID,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::CategoryInUse
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

/// Map the six category columns starting at `offset` to a [Category].
///
/// The `offset` lets a query join the category onto another table and read
/// both from the same row.
pub fn map_category_row(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(offset)?,
        user_id: UserID::new(row.get(offset + 1)?),
        name: row.get(offset + 2)?,
        category_type: row.get(offset + 3)?,
        created_at: row.get(offset + 4)?,
        updated_at: row.get(offset + 5)?,
    })
}
