//! Request and response DTOs for account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::accounts::UpdateProfileCommand;
use crate::domain::account::{AccountType, SignInDecision, SignOutReason, UserProfile};

/// Body of `POST /api/auth/session` responses.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SessionResponse {
    Allow {
        profile: UserProfile,
    },
    SignOut {
        reason: SignOutReason,
        redirect_to: &'static str,
    },
}

impl From<SignInDecision> for SessionResponse {
    fn from(decision: SignInDecision) -> Self {
        match decision {
            SignInDecision::Allow { profile } => Self::Allow { profile },
            SignInDecision::SignOut {
                reason,
                redirect_to,
            } => Self::SignOut {
                reason,
                redirect_to,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub account_type: AccountType,
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
}

/// Partial update; omitted fields are left alone, empty strings clear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileCommand {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            company_name: req.company_name,
            phone: req.phone,
        }
    }
}
