//! Authentication middleware that checks bearer tokens and attaches the caller's identity to the request.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{TokenService, UserID},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Verifies the bearer tokens.
    pub token_service: TokenService,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_service: state.token_service.clone(),
        }
    }
}

/// The identity of the user making a request, as verified by [auth_guard].
///
/// Use this as a handler argument on any route behind [auth_guard]. Handlers
/// must scope every data operation to `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The ID of the user the token was issued to.
    pub user_id: UserID,
    /// The email of the user the token was issued to.
    pub email: String,
}

/// Why a request was turned away by [auth_guard].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// The request had no `Authorization` header.
    NoToken,
    /// The `Authorization` header was not a valid bearer token.
    ///
    /// This covers malformed headers, bad signatures, expired tokens and
    /// tokens that do not parse.
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let reason = match self {
            AuthRejection::NoToken => "no token provided",
            AuthRejection::InvalidToken => "invalid token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!(
                    "No authenticated user on request to {}. Is the route behind the auth guard?",
                    parts.uri.path()
                );
                AuthRejection::NoToken
            })
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// If the token is valid, an [AuthenticatedUser] is placed into the request
/// extensions and the request executed normally. Otherwise a 401 response is
/// returned and the route handler never runs.
///
/// The reason a token failed verification is logged, but the response only
/// ever says "invalid token".
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(rejection) if rejection.is_missing() => {
            tracing::debug!("Rejected request to {} with no token.", parts.uri.path());
            return AuthRejection::NoToken.into_response();
        }
        Err(rejection) => {
            tracing::warn!(
                "Rejected request to {} with a malformed authorization header: {rejection}",
                parts.uri.path()
            );
            return AuthRejection::InvalidToken.into_response();
        }
    };

    let claims = match state.token_service.verify(bearer.token()) {
        Ok(claims) => claims,
        Err(error) => {
            tracing::warn!(
                "Rejected request to {} with an invalid token: {error}",
                parts.uri.path()
            );
            return AuthRejection::InvalidToken.into_response();
        }
    };

    parts.extensions.insert(AuthenticatedUser {
        user_id: claims.user_id,
        email: claims.email,
    });

    next.run(Request::from_parts(parts, body)).await
}
