//! Admin account review: approval, rejection, deactivation and the pending queue.

use std::sync::Arc;

use serde_json::json;

use super::profile::load_profile;
use crate::application::side_effects::{queue_email, record_audit};
use crate::application::Actor;
use crate::domain::account::UserProfile;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::email::templates;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{AuditLog, EmailQueue, ProfileRepository};

/// Admin decision on a business account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone)]
pub struct ReviewAccountCommand {
    pub actor: Actor,
    pub user_id: UserId,
    pub decision: AccountDecision,
}

/// Handler for approving or rejecting a pending business account.
///
/// Approval emails the account holder. Both outcomes are audited.
pub struct ReviewAccountHandler {
    profiles: Arc<dyn ProfileRepository>,
    emails: Arc<dyn EmailQueue>,
    audit: Arc<dyn AuditLog>,
}

impl ReviewAccountHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        emails: Arc<dyn EmailQueue>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            profiles,
            emails,
            audit,
        }
    }

    pub async fn handle(&self, cmd: ReviewAccountCommand) -> Result<UserProfile, DomainError> {
        cmd.actor.ensure_admin()?;
        let mut profile = load_profile(self.profiles.as_ref(), &cmd.user_id).await?;

        let action = match cmd.decision {
            AccountDecision::Approve => {
                profile.approve()?;
                AuditAction::AccountApproved
            }
            AccountDecision::Reject => {
                profile.reject()?;
                AuditAction::AccountRejected
            }
        };
        self.profiles.update(&profile).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                action,
                "profile",
                &profile.id,
                json!({ "account_type": profile.account_type.as_str() }),
            ),
        )
        .await;

        if cmd.decision == AccountDecision::Approve {
            let name = profile
                .company_name
                .as_deref()
                .or(profile.display_name.as_deref())
                .unwrap_or(profile.email.as_str());
            queue_email(
                self.emails.as_ref(),
                templates::account_approved(&profile.email, name),
            )
            .await;
        }

        tracing::info!(
            user_id = %profile.id,
            approval_status = %profile.approval_status,
            "Account reviewed"
        );
        Ok(profile)
    }
}

#[derive(Debug, Clone)]
pub struct DeactivateAccountCommand {
    pub actor: Actor,
    pub user_id: UserId,
}

/// Admin switch-off. The account is refused at its next sign-in.
pub struct DeactivateAccountHandler {
    profiles: Arc<dyn ProfileRepository>,
    audit: Arc<dyn AuditLog>,
}

impl DeactivateAccountHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { profiles, audit }
    }

    pub async fn handle(&self, cmd: DeactivateAccountCommand) -> Result<UserProfile, DomainError> {
        cmd.actor.ensure_admin()?;
        let mut profile = load_profile(self.profiles.as_ref(), &cmd.user_id).await?;
        profile.deactivate();
        self.profiles.update(&profile).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                AuditAction::AccountDeactivated,
                "profile",
                &profile.id,
                json!({}),
            ),
        )
        .await;
        Ok(profile)
    }
}

/// Business accounts awaiting review, oldest first.
pub struct ListPendingAccountsHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl ListPendingAccountsHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, actor: &Actor) -> Result<Vec<UserProfile>, DomainError> {
        actor.ensure_admin()?;
        self.profiles.list_pending_approval().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin, competitor, user};
    use crate::domain::account::{AccountType, ApprovalStatus, SignInDecision};
    use crate::domain::email::templates::ACCOUNT_APPROVED;
    use crate::domain::foundation::ErrorCode;

    async fn pending_shop(store: &InMemoryStore) -> UserProfile {
        let profile = UserProfile::sign_up(
            user("shop-1"),
            "owner@loudshop.com",
            Some("Loud Shop".to_string()),
            AccountType::Retailer,
            true,
        )
        .unwrap();
        store.save(&profile).await.unwrap();
        profile
    }

    fn review_handler(store: &InMemoryStore) -> ReviewAccountHandler {
        let shared = Arc::new(store.clone());
        ReviewAccountHandler::new(shared.clone(), shared.clone(), shared)
    }

    #[tokio::test]
    async fn approval_emails_and_audits() {
        let store = InMemoryStore::new();
        pending_shop(&store).await;

        let profile = review_handler(&store)
            .handle(ReviewAccountCommand {
                actor: admin(),
                user_id: user("shop-1"),
                decision: AccountDecision::Approve,
            })
            .await
            .unwrap();

        assert_eq!(profile.approval_status, ApprovalStatus::Approved);
        assert!(SignInDecision::evaluate(Some(profile)).is_allowed());
        let emails = store.queued_emails().await;
        assert_eq!(emails[0].message.to, "owner@loudshop.com");
        assert_eq!(emails[0].message.template.as_deref(), Some(ACCOUNT_APPROVED));
        assert_eq!(
            store.audit_entries().await[0].action,
            AuditAction::AccountApproved
        );
        assert!(store.list_pending_approval().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn decided_account_cannot_be_reviewed_again() {
        let store = InMemoryStore::new();
        pending_shop(&store).await;
        let handler = review_handler(&store);
        let reject = ReviewAccountCommand {
            actor: admin(),
            user_id: user("shop-1"),
            decision: AccountDecision::Reject,
        };

        handler.handle(reject.clone()).await.unwrap();
        let err = handler.handle(reject).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(store.queued_emails().await.is_empty());
    }

    #[tokio::test]
    async fn only_admins_review_or_list() {
        let store = InMemoryStore::new();
        pending_shop(&store).await;

        let err = review_handler(&store)
            .handle(ReviewAccountCommand {
                actor: competitor("fan-1"),
                user_id: user("shop-1"),
                decision: AccountDecision::Approve,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let listing = ListPendingAccountsHandler::new(Arc::new(store.clone()));
        assert!(listing.handle(&competitor("fan-1")).await.is_err());
        assert_eq!(listing.handle(&admin()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deactivated_account_is_signed_out() {
        let store = InMemoryStore::new();
        pending_shop(&store).await;

        let profile = DeactivateAccountHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
            .handle(DeactivateAccountCommand {
                actor: admin(),
                user_id: user("shop-1"),
            })
            .await
            .unwrap();

        assert!(!profile.is_active);
        assert!(!SignInDecision::evaluate(Some(profile)).is_allowed());
    }
}
