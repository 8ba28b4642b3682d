#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, PaginationConfig, PasswordHash, TokenService, UserID,
    auth::{AuthResponse, UserProfile, create_user},
    build_router,
    database_id::{CategoryID, TransactionID},
    db::initialize,
    endpoints,
};

/// The password used by [register_test_user].
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The lowest cost bcrypt accepts, so tests that hash passwords stay fast.
const TEST_HASH_COST: u32 = 4;

pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let token_service = TokenService::new("test secret", crate::DEFAULT_TOKEN_LIFETIME)
        .expect("Could not create token service");

    AppState::new(
        connection,
        token_service,
        TEST_HASH_COST,
        PaginationConfig::default(),
    )
    .expect("Could not create app state")
}

pub(crate) fn get_test_server() -> TestServer {
    TestServer::new(build_router(get_test_app_state())).expect("Could not create test server.")
}

/// An initialized in-memory database with two users, Alice and Bob.
pub(crate) fn get_test_db_with_users() -> (Connection, UserID, UserID) {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    let alice = create_user(
        "Alice",
        "alice@example.com",
        PasswordHash::new_unchecked("hunter2"),
        &connection,
    )
    .expect("Could not create test user");
    let bob = create_user(
        "Bob",
        "bob@example.com",
        PasswordHash::new_unchecked("hunter3"),
        &connection,
    )
    .expect("Could not create test user");

    (connection, alice.id, bob.id)
}

/// Register a user with `email` and [TEST_PASSWORD] and return their token and profile.
pub(crate) async fn register_test_user(server: &TestServer, email: &str) -> (String, UserProfile) {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<AuthResponse>();

    (body.token, body.user)
}

#[track_caller]
fn get_id(body: &Value, key: &str) -> i64 {
    body[key]["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("response has no {key} ID: {body}"))
}

pub(crate) async fn create_test_category(
    server: &TestServer,
    token: &str,
    name: &str,
    category_type: &str,
) -> CategoryID {
    let response = server
        .post(endpoints::CATEGORIES)
        .authorization_bearer(token)
        .json(&json!({ "name": name, "type": category_type }))
        .await;

    response.assert_status(StatusCode::CREATED);
    get_id(&response.json::<Value>(), "category")
}

pub(crate) async fn create_test_transaction(
    server: &TestServer,
    token: &str,
    category_id: CategoryID,
    amount: f64,
    date: &str,
) -> TransactionID {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .authorization_bearer(token)
        .json(&json!({
            "category_id": category_id,
            "amount": amount,
            "date": date,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    get_id(&response.json::<Value>(), "transaction")
}
