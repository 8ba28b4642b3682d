//! Defines the endpoint for fetching a single transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, AuthenticatedUser, Error,
    database_id::{IdPath, TransactionID},
    db::lock_connection,
    transaction::domain::get_transaction,
};

/// The state needed to get a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with a transaction of the logged in user.
pub async fn get_transaction_endpoint(
    IdPath(transaction_id): IdPath<TransactionID>,
    State(state): State<GetTransactionState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, user.user_id, &connection)?;

    Ok(Json(json!({ "transaction": transaction })))
}
