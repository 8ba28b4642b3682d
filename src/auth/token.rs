//! Issues and verifies the signed bearer tokens that identify a user.
//!
//! Tokens are HS256 JSON Web Tokens. Verification is stateless: a token is
//! valid if and only if its signature matches the configured secret and its
//! expiry has not passed. There is no revocation list, logging out is handled
//! by the client discarding its token.

use std::fmt::Debug;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::auth::{AuthError, UserID};

/// How long a token is valid for after it is issued.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(72);

/// The contents of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub user_id: UserID,
    /// The email of the user at the time the token was issued.
    pub email: String,
    /// When the token was issued, as a unix timestamp in seconds.
    pub iat: i64,
    /// When the token expires, as a unix timestamp in seconds.
    pub exp: i64,
}

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    /// Create a token service that signs tokens with `secret` and issues tokens
    /// that are valid for `lifetime`.
    ///
    /// # Errors
    ///
    /// Returns [AuthError::Unavailable] if `secret` is empty, or if `lifetime`
    /// is not positive or too long to add to the current time.
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Unavailable(
                "the token signing secret must not be empty".to_owned(),
            ));
        }

        if !lifetime.is_positive() {
            return Err(AuthError::Unavailable(format!(
                "the token lifetime must be positive, got {lifetime}"
            )));
        }

        if OffsetDateTime::now_utc().checked_add(lifetime).is_none() {
            return Err(AuthError::Unavailable(format!(
                "the token lifetime {lifetime} is too long"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    /// The duration for which newly issued tokens are valid.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for the user with `user_id` and `email` that expires
    /// after the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [AuthError::Unavailable] if the token could not be signed.
    pub fn issue(&self, user_id: UserID, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, OffsetDateTime::now_utc())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [AuthError::Unavailable] if the expiry is out of range or the
    /// token could not be signed.
    pub fn issue_at(
        &self,
        user_id: UserID,
        email: &str,
        now: OffsetDateTime,
    ) -> Result<String, AuthError> {
        let expires_at = now.checked_add(self.lifetime).ok_or_else(|| {
            AuthError::Unavailable(format!("the token expiry is out of range for {now}"))
        })?;

        let claims = Claims {
            user_id,
            email: email.to_owned(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AuthError::Unavailable(error.to_string()))
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [AuthError::SignatureMismatch] if the token was not signed with this service's secret,
    /// - [AuthError::Expired] if the token has expired,
    /// - [AuthError::Malformed] if the token cannot be parsed into [Claims].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| match error.kind() {
                ErrorKind::InvalidSignature => AuthError::SignatureMismatch,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })
    }
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;
    use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

    use crate::auth::{AuthError, DEFAULT_TOKEN_LIFETIME, TokenService, UserID};

    fn get_token_service() -> TokenService {
        TokenService::new("averysecretsecret", DEFAULT_TOKEN_LIFETIME).unwrap()
    }

    #[test]
    fn new_fails_on_empty_secret() {
        let result = TokenService::new("", DEFAULT_TOKEN_LIFETIME);

        assert!(matches!(result, Err(AuthError::Unavailable(_))));
    }

    #[test]
    fn new_fails_on_zero_lifetime() {
        let result = TokenService::new("foobar", Duration::ZERO);

        assert!(matches!(result, Err(AuthError::Unavailable(_))));
    }

    #[test]
    fn new_fails_on_lifetime_past_the_calendar() {
        let result = TokenService::new("foobar", Duration::MAX);

        assert!(matches!(result, Err(AuthError::Unavailable(_))));
    }

    #[test]
    fn issue_at_fails_when_expiry_is_out_of_range() {
        let service = get_token_service();
        let now = PrimitiveDateTime::new(Date::MAX, Time::MIDNIGHT).assume_utc();

        let result = service.issue_at(UserID::new(1), "a@b.com", now);

        assert!(matches!(result, Err(AuthError::Unavailable(_))));
    }

    #[test]
    fn verify_returns_issued_claims() {
        let service = get_token_service();
        let user_id = UserID::new(42);

        let token = service.issue(user_id, "a@b.com").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(
            claims.exp - claims.iat,
            DEFAULT_TOKEN_LIFETIME.whole_seconds()
        );
    }

    #[test]
    fn verify_fails_on_expired_token() {
        let service = get_token_service();
        let issued_at = OffsetDateTime::now_utc() - DEFAULT_TOKEN_LIFETIME - Duration::minutes(1);

        let token = service
            .issue_at(UserID::new(1), "a@b.com", issued_at)
            .unwrap();

        assert_eq!(service.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn verify_fails_on_flipped_signature_byte() {
        let service = get_token_service();
        let token = service.issue(UserID::new(1), "a@b.com").unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[signature_start] = if bytes[signature_start] == b'A' {
            b'B'
        } else {
            b'A'
        };
        let tampered_token = String::from_utf8(bytes).unwrap();

        assert_eq!(
            service.verify(&tampered_token),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn verify_fails_on_token_from_another_secret() {
        let service = get_token_service();
        let other_service = TokenService::new("adifferentsecret", DEFAULT_TOKEN_LIFETIME).unwrap();
        let token = other_service.issue(UserID::new(1), "a@b.com").unwrap();

        assert_eq!(service.verify(&token), Err(AuthError::SignatureMismatch));
    }

    #[test]
    fn verify_fails_on_garbage() {
        let service = get_token_service();

        assert_eq!(service.verify("not-a-valid-jwt"), Err(AuthError::Malformed));
        assert_eq!(service.verify(""), Err(AuthError::Malformed));
    }

    #[test]
    fn verify_fails_on_unexpected_claims() {
        let service = get_token_service();
        let exp = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();
        let token = encode(
            &Header::default(),
            &json!({ "sub": "someone", "exp": exp }),
            &EncodingKey::from_secret(b"averysecretsecret"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(AuthError::Malformed));
    }
}
