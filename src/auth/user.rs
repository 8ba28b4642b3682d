//! Code for creating the user table and fetching users from the database.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::{AuthenticatedUser, PasswordHash},
    db::lock_connection,
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The email address the user logs in with.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the user registered.
    pub created_at: OffsetDateTime,
}

/// The public view of a [User], without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The email address the user logs in with.
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at: row.get(4)?,
    })
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns:
/// - [Error::DuplicateEmail] if `email` belongs to another user,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    name: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO user (name, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
        (name, email, password_hash.as_ref(), created_at),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash,
        created_at,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user ([Error::NotFound]),
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the user from the database that registered with `email`.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a registered user ([Error::NotFound]),
/// - there was an error trying to access the database.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE email = :email")?
        .query_row(&[(":email", email)], map_row_to_user)
        .map_err(|error| error.into())
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if no user has `user_id`, or an SQL error.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::UserNotFound),
        _ => Ok(()),
    }
}

/// The state needed to get the profile of the logged in user.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the profile of the logged in user.
pub async fn get_profile(
    State(state): State<ProfileState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let profile = match get_user_by_id(user.user_id, &connection) {
        Ok(user) => UserProfile::from(&user),
        Err(Error::NotFound) => return Err(Error::UserNotFound),
        Err(error) => return Err(error),
    };

    Ok(Json(json!({ "user": profile })))
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{
            PasswordHash,
            user::{UserID, create_user, get_user_by_email, get_user_by_id, update_password},
        },
    };

    use super::create_user_table;

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user =
            create_user("Foo", "foo@bar.baz", password_hash.clone(), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.name, "Foo");
        assert_eq!(inserted_user.email, "foo@bar.baz");
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let db_connection = get_db_connection();
        create_user(
            "Foo",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            "Bar",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Foo",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_email_succeeds() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Foo",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_email("foo@bar.baz", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
        assert_eq!(
            get_user_by_email("bar@baz.qux", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_password_replaces_hash() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Foo",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(test_user.id, &new_hash, &db_connection).unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();
        assert_eq!(retrieved_user.password_hash, new_hash);
    }

    #[test]
    fn update_password_fails_for_missing_user() {
        let db_connection = get_db_connection();

        let result = update_password(
            UserID::new(1),
            &PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::UserNotFound));
    }
}
