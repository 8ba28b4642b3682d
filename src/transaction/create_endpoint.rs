//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, AuthenticatedUser, Error,
    db::lock_connection,
    transaction::{TransactionForm, domain::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction for the logged in user.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    user: AuthenticatedUser,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let new_transaction = form.into_new_transaction()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(user.user_id, new_transaction, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction created successfully",
            "transaction": transaction,
        })),
    ))
}
