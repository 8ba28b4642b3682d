//! The failure modes of password and token checks.

/// Errors from hashing and verifying passwords, and issuing and verifying tokens.
///
/// These distinctions are for server-side logging only. The auth gate
/// collapses every verification failure into a single "invalid token"
/// response so that clients cannot tell an expired token from a forged one.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token or password digest could not be parsed.
    #[error("the token or password hash is malformed")]
    Malformed,

    /// The token is past its expiry time.
    #[error("the token has expired")]
    Expired,

    /// The token was altered or signed with a different key.
    #[error("the token signature does not match")]
    SignatureMismatch,

    /// The password does not match the stored password hash.
    #[error("the password does not match")]
    CredentialMismatch,

    /// The signing key or hashing library could not be used.
    ///
    /// This is the only fatal auth error. Tokens must never be issued when
    /// it occurs.
    #[error("auth resource unavailable: {0}")]
    Unavailable(String),
}
