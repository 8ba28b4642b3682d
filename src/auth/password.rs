//! One-way, salted password hashing with bcrypt.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};

use crate::auth::AuthError;

/// A salted and hashed password.
///
/// The hash is never serialized into API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `raw_password` with a fresh random salt and the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return [AuthError::Unavailable] if bcrypt could not hash the password,
    /// e.g. `cost` is out of range.
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, AuthError> {
        hash(raw_password, cost)
            .map(Self)
            .map_err(|error| AuthError::Unavailable(error.to_string()))
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check whether `raw_password` matches the stored password.
    ///
    /// The comparison runs in constant time.
    ///
    /// # Errors
    ///
    /// A wrong password gives `Ok(false)`, never an error. This function only
    /// returns [AuthError::Malformed] if the stored hash cannot be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, AuthError> {
        verify(raw_password, &self.0).map_err(|error| match error {
            BcryptError::InvalidHash(_) | BcryptError::CostNotAllowed(_) => AuthError::Malformed,
            error => AuthError::Unavailable(error.to_string()),
        })
    }

    /// Like [PasswordHash::verify], but a wrong password is reported as
    /// [AuthError::CredentialMismatch].
    pub fn check(&self, raw_password: &str) -> Result<(), AuthError> {
        if self.verify(raw_password)? {
            Ok(())
        } else {
            Err(AuthError::CredentialMismatch)
        }
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::auth::{AuthError, PasswordHash};

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "okon";

        assert!(hash.verify(password).unwrap());
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "thewrongpassword";

        assert!(!hash.verify(password).unwrap());
    }

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = "roostersgocockledoodledoo";
        let wrong_password = "the_wrong_password";
        let hash = PasswordHash::new(password, 4).unwrap();

        assert!(hash.verify(password).unwrap());
        assert!(!hash.verify(wrong_password).unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = "turkeysgogobblegobble";
        let hash = PasswordHash::new(password, 4).unwrap();
        let dupe_hash = PasswordHash::new(password, 4).unwrap();

        assert_ne!(hash, dupe_hash);
        assert!(hash.verify(password).unwrap());
        assert!(dupe_hash.verify(password).unwrap());
    }

    #[test]
    fn hash_looks_like_bcrypt() {
        let hash = PasswordHash::new("hunter2", 4).unwrap();

        assert_eq!(hash.as_ref().len(), 60);
        assert!(hash.as_ref().starts_with("$2"));
    }

    #[test]
    fn verify_fails_on_malformed_hash() {
        let hash = PasswordHash::new_unchecked("definitely not a bcrypt hash");

        assert_eq!(hash.verify("hunter2"), Err(AuthError::Malformed));
    }

    #[test]
    fn verify_fails_on_hash_with_invalid_cost() {
        let hash = PasswordHash::new_unchecked(
            "$2b$99$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert_eq!(hash.verify("okon"), Err(AuthError::Malformed));
    }

    #[test]
    fn check_reports_credential_mismatch() {
        let hash = PasswordHash::new("correcthorsebatterystaple", 4).unwrap();

        assert_eq!(hash.check("correcthorsebatterystaple"), Ok(()));
        assert_eq!(hash.check("hunter2"), Err(AuthError::CredentialMismatch));
    }

    #[test]
    fn new_fails_on_invalid_cost() {
        let result = PasswordHash::new("hunter2", 1);

        assert!(matches!(result, Err(AuthError::Unavailable(_))));
    }
}
