//! Profile creation, lookup and self-service edits.

use std::sync::Arc;

use crate::domain::account::{AccountType, UserProfile};
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::ProfileRepository;

fn profile_not_found(id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::ProfileNotFound, format!("Profile {} not found", id))
}

pub(crate) async fn load_profile(
    profiles: &dyn ProfileRepository,
    id: &UserId,
) -> Result<UserProfile, DomainError> {
    profiles
        .find_by_id(id)
        .await?
        .ok_or_else(|| profile_not_found(id))
}

/// Command to create the caller's profile on first sign-up.
#[derive(Debug, Clone)]
pub struct CreateProfileCommand {
    pub user: AuthenticatedUser,
    pub account_type: AccountType,
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
}

/// Handler for first-time profile creation.
///
/// Business account types start pending manual approval. A second call for
/// the same user is a `Conflict`.
pub struct CreateProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl CreateProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, cmd: CreateProfileCommand) -> Result<UserProfile, DomainError> {
        let mut profile = UserProfile::sign_up(
            cmd.user.id,
            cmd.user.email,
            clean(cmd.display_name).or(cmd.user.display_name),
            cmd.account_type,
            cmd.user.email_verified,
        )?;
        profile.company_name = clean(cmd.company_name);
        profile.phone = clean(cmd.phone);

        self.profiles.save(&profile).await?;
        tracing::info!(
            user_id = %profile.id,
            account_type = %profile.account_type,
            approval_status = %profile.approval_status,
            "Profile created"
        );
        Ok(profile)
    }
}

/// Fetches the caller's own profile.
pub struct GetProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl GetProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<UserProfile, DomainError> {
        load_profile(self.profiles.as_ref(), &user_id).await
    }
}

/// Self-service edit. `None` leaves a field unchanged; an empty string
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileCommand {
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
}

pub struct UpdateProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl UpdateProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, user_id: UserId, cmd: UpdateProfileCommand) -> Result<UserProfile, DomainError> {
        let mut profile = load_profile(self.profiles.as_ref(), &user_id).await?;
        if let Some(display_name) = cmd.display_name {
            profile.display_name = clean(Some(display_name));
        }
        if let Some(company_name) = cmd.company_name {
            profile.company_name = clean(Some(company_name));
        }
        if let Some(phone) = cmd.phone {
            profile.phone = clean(Some(phone));
        }
        profile.updated_at = Timestamp::now();
        self.profiles.update(&profile).await?;
        Ok(profile)
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
