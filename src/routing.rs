//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{auth_guard, get_profile, post_log_in, register_user},
    balance::get_balance_endpoint,
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_health))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::PROFILE, get(get_profile))
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::BALANCE, get(get_balance_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the server is up and which version it is running.
async fn get_health() -> impl IntoResponse {
    Json(json!({
        "message": "Finance Tracker API is running!",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
