//! The running totals of a user's income and expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, AuthenticatedUser, Error, UserID, db::lock_connection};

/// The totals of a user's transactions grouped by category type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of the amounts of transactions in income categories.
    pub total_income: f64,
    /// The sum of the amounts of transactions in expense categories.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
}

/// Sum the transactions of `user_id` by the type of their category.
///
/// Users with no transactions have a zero balance.
pub fn get_balance(user_id: UserID, connection: &Connection) -> Result<Balance, Error> {
    let (total_income, total_expense): (f64, f64) = connection
        .prepare(
            "SELECT
                COALESCE(SUM(CASE WHEN category.type = 'income' THEN \"transaction\".amount END), 0.0),
                COALESCE(SUM(CASE WHEN category.type = 'expense' THEN \"transaction\".amount END), 0.0)
             FROM \"transaction\"
             INNER JOIN category ON \"transaction\".category_id = category.id
             WHERE \"transaction\".user_id = ?1",
        )?
        .query_row([user_id.as_i64()], |row| Ok((row.get(0)?, row.get(1)?)))?;

    Ok(Balance {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    })
}

/// The state needed to get the balance.
#[derive(Debug, Clone)]
pub struct BalanceState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the income, expense and balance totals of the logged in user.
pub async fn get_balance_endpoint(
    State(state): State<BalanceState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let balance = get_balance(user.user_id, &connection)?;

    Ok(Json(balance))
}


#[cfg(test)]
mod get_balance_endpoint_tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{
            create_test_category, create_test_transaction, get_test_server, register_test_user,
        },
    };

    #[tokio::test]
    async fn responds_with_totals() {
        let server = get_test_server();
        let (token, _) = register_test_user(&server, "alice@example.com").await;
        let salary = create_test_category(&server, &token, "Pay", "income").await;
        let food = create_test_category(&server, &token, "Groceries", "expense").await;
        create_test_transaction(&server, &token, salary, 2000.0, "2024-01-01").await;
        create_test_transaction(&server, &token, food, 150.5, "2024-01-02").await;

        let response = server
            .get(endpoints::BALANCE)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "total_income": 2000.0, "total_expense": 150.5, "balance": 1849.5 })
        );
    }

    #[tokio::test]
    async fn requires_token() {
        let server = get_test_server();

        server
            .get(endpoints::BALANCE)
            .await
            .assert_status_unauthorized();
    }
}
