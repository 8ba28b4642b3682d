//! The route for registering a new user.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{PasswordHash, TokenService, log_in::AuthResponse, user::create_user},
    category::create_default_categories,
    db::lock_connection,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// Issues the token returned on a successful registration.
    pub token_service: TokenService,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
    /// The database connection for inserting users and their categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_service: state.token_service.clone(),
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data sent in a registration request.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterForm {
    /// The user's display name.
    #[serde(default)]
    pub name: String,
    /// The email the user will log in with.
    #[serde(default)]
    pub email: String,
    /// The plain text password, hashed before it is stored.
    #[serde(default)]
    pub password: String,
}

/// Create a user, seed their default categories and respond with a token.
///
/// The user and their categories are inserted in a single database
/// transaction, so a failed registration leaves nothing behind.
///
/// # Errors
///
/// Responds with 400 if any field is empty or the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(user_data): Json<RegisterForm>,
) -> Result<impl IntoResponse, Error> {
    if user_data.name.is_empty() || user_data.email.is_empty() || user_data.password.is_empty() {
        return Err(Error::MissingFields("All fields are required"));
    }

    let password_hash = PasswordHash::new(&user_data.password, state.password_hash_cost)
        .inspect_err(|error| tracing::error!("Could not hash password: {error}"))?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;
        let transaction = connection.unchecked_transaction()?;

        let user = create_user(
            &user_data.name,
            &user_data.email,
            password_hash,
            &transaction,
        )?;
        create_default_categories(user.id, &transaction)?;

        transaction.commit()?;
        user
    };

    tracing::info!("Registered user {}.", user.id);

    let response = AuthResponse::issue("User registered successfully", &user, &state.token_service)?;

    Ok((StatusCode::CREATED, Json(response)))
}
