//! HS256 JWT session validator for the hosted auth service.
//!
//! Access tokens are signed with a shared secret and carry `sub`, `email`, `aud`
//! and `exp`. The configured admin API token is accepted as well and maps to a
//! service-admin identity.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Subject reported for callers using the admin API token.
pub const SERVICE_ADMIN_SUBJECT: &str = "service-admin";

#[derive(Clone)]
pub struct JwtConfig {
    secret: SecretString,
    issuer: Option<String>,
    audience: String,
    admin_api_token: Option<SecretString>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            issuer: None,
            audience: audience.into(),
            admin_api_token: None,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_api_token = token.map(SecretString::new);
        self
    }
}

/// Claims issued by the hosted auth service.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

pub struct JwtSessionValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&config.audience]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        Self {
            config,
            decoding_key,
            validation,
        }
    }

    fn is_admin_token(&self, token: &str) -> bool {
        match &self.config.admin_api_token {
            Some(admin) => {
                let expected = admin.expose_secret().as_bytes();
                expected.len() == token.len() && bool::from(expected.ct_eq(token.as_bytes()))
            }
            None => false,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if self.is_admin_token(token) {
            let id = UserId::new(SERVICE_ADMIN_SUBJECT).map_err(|_| AuthError::InvalidToken)?;
            return Ok(AuthenticatedUser::service_admin(id));
        }

        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                        tracing::warn!(error = %e, "Token issued for another audience");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!(error = %e, "Token validation failed");
                        AuthError::InvalidToken
                    }
                }
            },
        )?;
        let claims = data.claims;

        let email = claims.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            tracing::warn!("Token missing email claim");
            AuthError::InvalidToken
        })?;
        let user_id = UserId::new(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let email_verified = claims
            .email_verified
            .or(claims.user_metadata.email_verified)
            .unwrap_or(false);

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            claims.user_metadata.full_name,
            email_verified,
        ))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

/// Signs an HS256 token the way the hosted auth service does, for tests.
#[cfg(test)]
fn sign_test_token(secret: &str, claims: &serde_json::Value) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
