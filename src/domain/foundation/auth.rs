//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what remains of a bearer token after the
//! `SessionValidator` port has checked it. Business rules (verification,
//! business-account approval) are evaluated separately against the profile row.

use super::UserId;
use thiserror::Error;

/// Caller identity extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Auth provider subject.
    pub id: UserId,

    pub email: String,

    pub display_name: Option<String>,

    /// Whether the auth provider has confirmed the email address.
    pub email_verified: bool,

    /// Set only for callers presenting the configured admin API token.
    pub is_service_admin: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
            is_service_admin: false,
        }
    }

    /// Identity used for machine callers holding the admin API token.
    pub fn service_admin(id: UserId) -> Self {
        Self {
            id,
            email: String::new(),
            display_name: Some("service".to_string()),
            email_verified: true,
            is_service_admin: true,
        }
    }

    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Session was idle longer than the inactivity timeout.
    #[error("Session expired after inactivity")]
    SessionExpired,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// True if the client should obtain a new token and sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        !matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let user = AuthenticatedUser::new(
            UserId::new("user-1").unwrap(),
            "judge@example.com",
            None,
            true,
        );
        assert_eq!(user.display_name_or_email(), "judge@example.com");
        assert!(!user.is_service_admin);
    }

    #[test]
    fn service_admin_is_flagged() {
        let user = AuthenticatedUser::service_admin(UserId::new("service").unwrap());
        assert!(user.is_service_admin);
    }

    #[test]
    fn only_outages_skip_reauthentication() {
        assert!(AuthError::SessionExpired.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }
}
