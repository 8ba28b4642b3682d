//! Defines the endpoint for deleting a transaction.
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
    transaction::domain::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction of the logged in user.
pub async fn delete_transaction_endpoint(
    IdPath(transaction_id): IdPath<TransactionID>,
    State(state): State<DeleteTransactionState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(transaction_id, user.user_id, &connection)?;

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
