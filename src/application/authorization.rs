//! Caller identity and permission checks shared by the handlers.
//!
//! Ownership and role rules live here instead of in database policies. An
//! `Actor` is resolved once per request from the validated token and the
//! caller's profile row, then passed into commands.

use crate::domain::account::{AccountType, SignInDecision};
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, UserId};
use crate::ports::ProfileRepository;

/// The caller of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    /// `None` when the caller's profile is missing or not cleared for use.
    pub account_type: Option<AccountType>,
}

impl Actor {
    pub fn new(user_id: UserId, account_type: Option<AccountType>) -> Self {
        Self {
            user_id,
            account_type,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Some(AccountType::Admin))
    }

    /// Resolves the caller's role from their profile.
    ///
    /// Holders of the admin API token are admins without a profile row.
    /// A profile only grants its role when it would pass sign-in: active,
    /// verified, and approved for business accounts. A confirmed email on the
    /// token counts as verified.
    pub async fn resolve(
        user: &AuthenticatedUser,
        profiles: &dyn ProfileRepository,
    ) -> Result<Self, DomainError> {
        if user.is_service_admin {
            return Ok(Self::admin(user.id.clone()));
        }
        let profile = profiles.find_by_id(&user.id).await?.map(|mut profile| {
            if user.email_verified {
                profile.mark_verified();
            }
            profile
        });
        let account_type = match SignInDecision::evaluate(profile) {
            SignInDecision::Allow { profile } => Some(profile.account_type),
            SignInDecision::SignOut { .. } => None,
        };
        Ok(Self::new(user.id.clone(), account_type))
    }

    pub fn is_admin(&self) -> bool {
        self.account_type == Some(AccountType::Admin)
    }

    pub fn can_organize(&self) -> bool {
        self.account_type.is_some_and(|t| t.can_organize())
    }

    pub fn is_business(&self) -> bool {
        self.is_admin() || self.account_type.is_some_and(|t| t.is_business())
    }

    pub fn ensure_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::forbidden("Admin access required"))
        }
    }

    /// The actor is the owner of the resource or an admin.
    pub fn can_act_for(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.user_id == owner
    }

    pub fn ensure_can_act_for(&self, owner: &UserId, resource: &str) -> Result<(), DomainError> {
        if self.can_act_for(owner) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("Not allowed to modify this {}", resource),
            )
            .with_detail("resource_type", resource)
            .with_detail("user_id", self.user_id.to_string()))
        }
    }
}
