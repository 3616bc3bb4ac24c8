//! SignInHandler - Decides whether a freshly authenticated user may stay signed in.

use std::sync::Arc;

use crate::domain::account::SignInDecision;
use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub user: AuthenticatedUser,
}

/// Handler for the sign-in gate.
///
/// The profile is looked up by auth subject only. When the token reports a
/// confirmed email the profile's verification flag is brought up to date
/// before the rules run.
pub struct SignInHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl SignInHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInDecision, DomainError> {
        let mut profile = self.profiles.find_by_id(&cmd.user.id).await?;

        if let Some(profile) = profile.as_mut() {
            if cmd.user.email_verified && profile.mark_verified() {
                self.profiles.update(profile).await?;
            }
        }

        let decision = SignInDecision::evaluate(profile);
        if let SignInDecision::SignOut { reason, .. } = &decision {
            tracing::info!(user_id = %cmd.user.id, reason = %reason, "Sign-in refused");
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{seed_profile, user};
    use crate::domain::account::{
        AccountType, SignOutReason, VerificationStatus, LOGIN_PATH, VERIFY_EMAIL_PATH,
    };

    fn signed_in(id: &str, verified: bool) -> SignInCommand {
        SignInCommand {
            user: AuthenticatedUser::new(user(id), format!("{}@example.com", id), None, verified),
        }
    }

    async fn unverified(store: &InMemoryStore, id: &str) {
        let mut profile = seed_profile(store, id, AccountType::Competitor).await;
        profile.verification_status = VerificationStatus::Pending;
        store.update(&profile).await.unwrap();
    }

    #[tokio::test]
    async fn pending_verification_redirects() {
        let store = InMemoryStore::new();
        unverified(&store, "fan-1").await;

        let decision = SignInHandler::new(Arc::new(store))
            .handle(signed_in("fan-1", false))
            .await
            .unwrap();
        assert_eq!(
            decision,
            SignInDecision::SignOut {
                reason: SignOutReason::EmailVerificationPending,
                redirect_to: VERIFY_EMAIL_PATH,
            }
        );
    }

    #[tokio::test]
    async fn verified_token_updates_profile_and_allows() {
        let store = InMemoryStore::new();
        unverified(&store, "fan-1").await;

        let decision = SignInHandler::new(Arc::new(store.clone()))
            .handle(signed_in("fan-1", true))
            .await
            .unwrap();

        assert!(decision.is_allowed());
        let profile = store.find_by_id(&user("fan-1")).await.unwrap().unwrap();
        assert_eq!(profile.verification_status, VerificationStatus::Verified);
    }

    #[tokio::test]
    async fn missing_profile_signs_out_to_login() {
        let store = InMemoryStore::new();
        let decision = SignInHandler::new(Arc::new(store))
            .handle(signed_in("ghost", true))
            .await
            .unwrap();
        assert_eq!(
            decision,
            SignInDecision::SignOut {
                reason: SignOutReason::ProfileNotFound,
                redirect_to: LOGIN_PATH,
            }
        );
    }
}
