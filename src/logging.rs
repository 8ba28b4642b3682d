//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Bodies longer than this many characters are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// JSON fields whose values must never be written to the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// The `Authorization` header and the `password` and `token` fields of JSON
/// bodies are redacted. Request bodies that are not JSON objects are omitted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &request_body_to_log_text(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &response_body_to_log_text(&parts.headers, &body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Redact a request body whatever its `Content-Type`.
///
/// Bodies that are not a JSON object are replaced by their length.
fn request_body_to_log_text(body: &Bytes) -> String {
    if body.is_empty() {
        return String::new();
    }

    let text = String::from_utf8_lossy(body);

    redact_json_fields(&text)
        .unwrap_or_else(|| format!("<{} bytes of non-JSON body omitted>", body.len()))
}

fn response_body_to_log_text(headers: &HeaderMap, body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);

    if is_json(headers) {
        redact_json_fields(&text).unwrap_or_else(|| text.into_owned())
    } else {
        text.into_owned()
    }
}

/// Replace the values of [REDACTED_FIELDS] in a JSON object.
///
/// Returns `None` if the text is not a JSON object.
fn redact_json_fields(json_text: &str) -> Option<String> {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(json_text) else {
        return None;
    };

    let mut redacted_any = false;

    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = Value::String(REDACTED.to_owned());
            redacted_any = true;
        }
    }

    if redacted_any {
        Some(Value::Object(object).to_string())
    } else {
        Some(json_text.to_owned())
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it is short enough.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let headers = redact_headers(&parts.headers);

    match truncate(body) {
        Some(truncated) => {
            tracing::info!(
                "Received request: {} {} {headers:#?}\nbody: {truncated}...",
                parts.method,
                parts.uri
            );
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!(
            "Received request: {} {} {headers:#?}\nbody: {body:?}",
            parts.method,
            parts.uri
        ),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let headers = &parts.headers;

    match truncate(body) {
        Some(truncated) => {
            tracing::info!(
                "Sending response: {} {headers:#?}\nbody: {truncated}...",
                parts.status
            );
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!(
            "Sending response: {} {headers:#?}\nbody: {body:?}",
            parts.status
        ),
    }
}
