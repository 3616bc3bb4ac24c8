//! Session validation port for bearer token validation.
//!
//! The HTTP layer hands every bearer token to this port. Implementations verify
//! the token and map its claims to an `AuthenticatedUser`; account rules
//! (verification, business approval) are evaluated later against the profile.
//!
//! # Contract
//!
//! Implementations must validate:
//! - **Signature**: token was issued by the hosted auth provider
//! - **Audience (aud)**: token is intended for this application
//! - **Expiry (exp)**: token is not expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// * `Err(AuthError::InvalidToken)` - token is malformed or signature invalid
/// * `Err(AuthError::TokenExpired)` - signature valid but expired
/// * `Err(AuthError::ServiceUnavailable)` - transient failure
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TestSessionValidator {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    impl TestSessionValidator {
        fn new() -> Self {
            Self {
                tokens: RwLock::new(HashMap::new()),
            }
        }

        fn add_valid_token(&self, token: &str, user: AuthenticatedUser) {
            self.tokens.write().unwrap().insert(token.to_string(), user);
        }
    }

    #[async_trait]
    impl SessionValidator for TestSessionValidator {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn session_validator_returns_user_for_valid_token() {
        let validator = TestSessionValidator::new();
        validator.add_valid_token(
            "valid-token-123",
            AuthenticatedUser::new(
                UserId::new("judge-7").unwrap(),
                "judge@example.com",
                None,
                true,
            ),
        );

        let user = validator.validate("valid-token-123").await.unwrap();
        assert_eq!(user.id.as_str(), "judge-7");
    }

    #[tokio::test]
    async fn session_validator_returns_error_for_invalid_token() {
        let validator = TestSessionValidator::new();
        let result = validator.validate("invalid-token").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn session_validator_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SessionValidator>();
    }
}
