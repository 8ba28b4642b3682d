//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, TokenService, db::initialize, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Issues and verifies the bearer tokens for the protected routes.
    pub token_service: TokenService,

    /// The bcrypt cost used when hashing passwords of new users.
    pub password_hash_cost: u32,

    /// The config that controls how to page lists of transactions.
    pub pagination_config: PaginationConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_service: TokenService,
        password_hash_cost: u32,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            token_service,
            password_hash_cost,
            pagination_config,
            db_connection: connection,
        })
    }
}
