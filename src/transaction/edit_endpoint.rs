//! Defines the endpoint for updating a transaction.
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
    transaction::{
        TransactionForm,
        domain::{get_transaction, update_transaction},
    },
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a transaction of the logged in user.
///
/// Fields that are missing, zero or empty in the request body are left unchanged.
pub async fn update_transaction_endpoint(
    IdPath(transaction_id): IdPath<TransactionID>,
    State(state): State<UpdateTransactionState>,
    user: AuthenticatedUser,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;

    // Other users' transactions must look missing, even when the body is invalid.
    get_transaction(transaction_id, user.user_id, &connection)?;

    let update = form.into_update()?;
    let transaction = update_transaction(transaction_id, user.user_id, update, &connection)?;

    Ok(Json(json!({
        "message": "Transaction updated successfully",
        "transaction": transaction,
    })))
}

#[cfg(test)]
mod update_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            create_test_category, create_test_transaction, get_test_server, register_test_user,
        },
    };

    #[tokio::test]
    async fn update_transaction_succeeds() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "alice@example.com").await;
        let food = create_test_category(&server, &token, "Food", "expense").await;
        let bills = create_test_category(&server, &token, "Bills", "expense").await;
        let transaction_id = create_test_transaction(&server, &token, food, 12.5, "2024-01-15").await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, transaction_id))
            .authorization_bearer(&token)
            .json(&json!({
                "category_id": bills,
                "description": "Power bill",
                "date": "2024-02-01",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Transaction updated successfully");
        let transaction = &body["transaction"];
        assert_eq!(transaction["amount"], 12.5);
        assert_eq!(transaction["description"], "Power bill");
        assert_eq!(transaction["date"], "2024-02-01");
        assert_eq!(transaction["category"]["name"], "Bills");
    }

    #[tokio::test]
    async fn update_transaction_fails_with_invalid_date() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "alice@example.com").await;
        let food = create_test_category(&server, &token, "Food", "expense").await;
        let transaction_id = create_test_transaction(&server, &token, food, 12.5, "2024-01-15").await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, transaction_id))
            .authorization_bearer(&token)
            .json(&json!({ "date": "2024-13-01" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Invalid date format. Use YYYY-MM-DD" })
        );
    }

    #[tokio::test]
    async fn update_transaction_fails_with_category_of_other_user() {
        let server = get_test_server();
        let (alice_token, _) = register_test_user(&server, "alice@example.com").await;
        let (bob_token, _) = register_test_user(&server, "bob@example.com").await;
        let alice_food = create_test_category(&server, &alice_token, "Food", "expense").await;
        let bob_food = create_test_category(&server, &bob_token, "Food", "expense").await;
        let transaction_id =
            create_test_transaction(&server, &alice_token, alice_food, 12.5, "2024-01-15").await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, transaction_id))
            .authorization_bearer(&alice_token)
            .json(&json!({ "category_id": bob_food }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Category not found" })
        );
    }

    #[tokio::test]
    async fn update_transaction_of_other_user_is_not_found() {
        let server = get_test_server();
        let (alice_token, _) = register_test_user(&server, "alice@example.com").await;
        let (bob_token, _) = register_test_user(&server, "bob@example.com").await;
        let food = create_test_category(&server, &alice_token, "Food", "expense").await;
        let transaction_id =
            create_test_transaction(&server, &alice_token, food, 12.5, "2024-01-15").await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, transaction_id))
            .authorization_bearer(&bob_token)
            .json(&json!({ "amount": 1000.0 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Transaction not found" })
        );
    }
}
