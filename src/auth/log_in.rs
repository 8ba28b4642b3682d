//! This file defines the route for handling log-in requests.
//! A successful log-in responds with a bearer token for the protected routes.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{AuthError, TokenService, User, UserProfile, get_user_by_email},
    db::lock_connection,
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// Issues the token returned on a successful log-in.
    pub token_service: TokenService,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_service: state.token_service.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The credentials sent in a log-in request.
///
/// Missing fields are treated the same as empty strings so that the client
/// gets a meaningful error message instead of a deserialization error.
#[derive(Clone, Default, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    #[serde(default)]
    pub email: String,
    /// Password entered during log-in.
    #[serde(default)]
    pub password: String,
}

/// The response body for a successful log-in or registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// A human readable description of what happened.
    pub message: String,
    /// The bearer token for the protected routes.
    pub token: String,
    /// The user that logged in.
    pub user: UserProfile,
}

impl AuthResponse {
    /// Issue a token for `user` and build the response body.
    pub(crate) fn issue(
        message: &str,
        user: &User,
        token_service: &TokenService,
    ) -> Result<Self, Error> {
        let token = token_service.issue(user.id, &user.email).map_err(|error| {
            tracing::error!("Could not issue token for user {}: {error}", user.id);
            Error::AuthError(error)
        })?;

        Ok(Self {
            message: message.to_owned(),
            token,
            user: UserProfile::from(user),
        })
    }
}

/// Handler for log-in requests via the POST method.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is empty.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or issuing the token.
pub async fn post_log_in(
    State(state): State<LoginState>,
    Json(user_data): Json<LogInData>,
) -> Result<impl IntoResponse, Error> {
    if user_data.email.is_empty() || user_data.password.is_empty() {
        return Err(Error::MissingFields("Email and password are required"));
    }

    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_email(&user_data.email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::debug!("Log-in attempt for unregistered email.");
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        }
    };

    match user.password_hash.check(&user_data.password) {
        Ok(()) => {}
        Err(AuthError::CredentialMismatch) => {
            tracing::debug!("Log-in attempt with the wrong password for user {}.", user.id);
            return Err(Error::InvalidCredentials);
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return Err(Error::AuthError(error));
        }
    }

    let response = AuthResponse::issue("Login successful", &user, &state.token_service)?;

    Ok(Json(response))
}
