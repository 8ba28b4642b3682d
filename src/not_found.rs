//! The fallback for requests that do not match any route.

use axum::response::{IntoResponse, Response};

use crate::Error;

/// Respond with a 404 JSON error for paths with no matching route.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
