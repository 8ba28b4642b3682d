//! A REST API for tracking personal finances.
//!
//! Users register with an email and password, receive a bearer token, and use
//! it to manage their own income and expense categories, record transactions
//! against those categories, and query their running balance.
//!
//! All resource routes sit behind [auth_guard], which verifies the bearer
//! token and hands the caller's identity to the route handlers.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod balance;
mod category;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod pagination;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    AuthError, AuthenticatedUser, Claims, DEFAULT_TOKEN_LIFETIME, PasswordHash, TokenService,
    User, UserID, auth_guard, create_user, get_user_by_email, update_password,
};
pub use category::{CategoryType, create_default_categories};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// The display text of the client facing variants is sent as-is in the
/// `{"error": ...}` body of the response.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination does not match a registered user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// One or more required fields were missing or empty in the request body.
    ///
    /// The string explains which fields are required.
    #[error("{0}")]
    MissingFields(&'static str),

    /// A date string could not be parsed as a calendar date.
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDate,

    /// A category ID filter could not be parsed as an integer.
    #[error("Invalid category ID")]
    InvalidCategoryID,

    /// An ID in the request path could not be parsed as an integer.
    #[error("Invalid ID")]
    InvalidID,

    /// A category type other than "income" or "expense" was given.
    #[error("Type must be 'income' or 'expense'")]
    InvalidCategoryType,

    /// The email address is already used by another user.
    #[error("Email already registered")]
    DuplicateEmail,

    /// The authenticated user no longer exists in the database.
    #[error("User not found")]
    UserNotFound,

    /// The category does not exist or belongs to another user.
    #[error("Category not found")]
    CategoryNotFound,

    /// The transaction does not exist or belongs to another user.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// The category cannot be deleted while transactions refer to it.
    #[error("Category is used by existing transactions")]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A password could not be hashed, a token could not be issued, or a stored
    /// password hash could not be read.
    ///
    /// The details should only be logged for debugging on the server.
    #[error("auth error: {0}")]
    AuthError(#[from] AuthError),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected request path: {rejection}");
        Error::InvalidID
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::MissingFields(_)
            | Error::InvalidDate
            | Error::InvalidCategoryID
            | Error::InvalidID
            | Error::InvalidCategoryType
            | Error::DuplicateEmail => StatusCode::BAD_REQUEST,
            Error::UserNotFound
            | Error::CategoryNotFound
            | Error::TransactionNotFound
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::CategoryInUse => StatusCode::CONFLICT,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
