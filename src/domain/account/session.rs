//! Sign-in gatekeeping and the inactivity policy.

use chrono::Duration;
use serde::Serialize;

use crate::domain::foundation::{str_enum, Timestamp};

use super::{ApprovalStatus, UserProfile, VerificationStatus};

pub const LOGIN_PATH: &str = "/login";
pub const VERIFY_EMAIL_PATH: &str = "/verify-email";
pub const PENDING_APPROVAL_PATH: &str = "/pending-approval";

/// Why a signed-in user is being forced back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutReason {
    ProfileNotFound,
    AccountInactive,
    EmailVerificationPending,
    ApprovalPending,
    AccountRejected,
}

str_enum!(SignOutReason {
    ProfileNotFound => "profile_not_found",
    AccountInactive => "account_inactive",
    EmailVerificationPending => "email_verification_pending",
    ApprovalPending => "approval_pending",
    AccountRejected => "account_rejected",
});

impl SignOutReason {
    /// Client route the user is sent to after the forced sign-out.
    pub fn redirect_to(&self) -> &'static str {
        match self {
            SignOutReason::EmailVerificationPending => VERIFY_EMAIL_PATH,
            SignOutReason::ApprovalPending => PENDING_APPROVAL_PATH,
            SignOutReason::ProfileNotFound
            | SignOutReason::AccountInactive
            | SignOutReason::AccountRejected => LOGIN_PATH,
        }
    }
}

/// Outcome of evaluating a freshly authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInDecision {
    Allow {
        profile: UserProfile,
    },
    SignOut {
        reason: SignOutReason,
        redirect_to: &'static str,
    },
}

impl SignInDecision {
    /// Applies the account rules in order: profile exists, account active,
    /// email verified, business approval granted.
    ///
    /// Profiles are looked up by user id only; there is no email-based fallback.
    pub fn evaluate(profile: Option<UserProfile>) -> Self {
        let Some(profile) = profile else {
            return Self::sign_out(SignOutReason::ProfileNotFound);
        };
        if !profile.is_active {
            return Self::sign_out(SignOutReason::AccountInactive);
        }
        if profile.verification_status == VerificationStatus::Pending {
            return Self::sign_out(SignOutReason::EmailVerificationPending);
        }
        if profile.account_type.is_business() {
            match profile.approval_status {
                ApprovalStatus::Pending => {
                    return Self::sign_out(SignOutReason::ApprovalPending)
                }
                ApprovalStatus::Rejected => {
                    return Self::sign_out(SignOutReason::AccountRejected)
                }
                ApprovalStatus::Approved | ApprovalStatus::NotRequired => {}
            }
        }
        SignInDecision::Allow { profile }
    }

    pub fn sign_out(reason: SignOutReason) -> Self {
        SignInDecision::SignOut {
            reason,
            redirect_to: reason.redirect_to(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, SignInDecision::Allow { .. })
    }
}

/// Force-logout after a period without requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityPolicy {
    timeout: Duration,
}

impl InactivityPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self::new(Duration::minutes(minutes))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Idle strictly longer than the timeout.
    pub fn is_expired(&self, last_activity: Timestamp, now: Timestamp) -> bool {
        now.duration_since(&last_activity) > self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountType, UserProfile};
    use crate::domain::foundation::UserId;

    fn competitor(verified: bool) -> UserProfile {
        UserProfile::sign_up(
            UserId::new("comp-1").unwrap(),
            "comp@example.com",
            None,
            AccountType::Competitor,
            verified,
        )
        .unwrap()
    }

    fn retailer() -> UserProfile {
        UserProfile::sign_up(
            UserId::new("shop-1").unwrap(),
            "shop@example.com",
            None,
            AccountType::Retailer,
            true,
        )
        .unwrap()
    }

    #[test]
    fn missing_profile_signs_out_to_login() {
        let decision = SignInDecision::evaluate(None);
        assert_eq!(decision, SignInDecision::sign_out(SignOutReason::ProfileNotFound));
        assert_eq!(SignOutReason::ProfileNotFound.redirect_to(), "/login");
    }

    #[test]
    fn pending_verification_signs_out_and_redirects() {
        match SignInDecision::evaluate(Some(competitor(false))) {
            SignInDecision::SignOut {
                reason,
                redirect_to,
            } => {
                assert_eq!(reason, SignOutReason::EmailVerificationPending);
                assert_eq!(redirect_to, "/verify-email");
            }
            other => panic!("expected sign-out, got {:?}", other),
        }
    }

    #[test]
    fn pending_business_approval_redirects_to_pending_page() {
        let decision = SignInDecision::evaluate(Some(retailer()));
        assert_eq!(decision, SignInDecision::sign_out(SignOutReason::ApprovalPending));
        assert_eq!(SignOutReason::ApprovalPending.redirect_to(), "/pending-approval");
    }

    #[test]
    fn verification_is_checked_before_approval() {
        let mut shop = retailer();
        shop.verification_status = VerificationStatus::Pending;
        assert_eq!(
            SignInDecision::evaluate(Some(shop)),
            SignInDecision::sign_out(SignOutReason::EmailVerificationPending)
        );
    }

    #[test]
    fn rejected_business_is_signed_out() {
        let mut shop = retailer();
        shop.reject().unwrap();
        assert_eq!(
            SignInDecision::evaluate(Some(shop)),
            SignInDecision::sign_out(SignOutReason::AccountRejected)
        );
    }

    #[test]
    fn inactive_account_is_signed_out_first() {
        let mut profile = competitor(false);
        profile.deactivate();
        assert_eq!(
            SignInDecision::evaluate(Some(profile)),
            SignInDecision::sign_out(SignOutReason::AccountInactive)
        );
    }

    #[test]
    fn verified_competitor_and_approved_business_are_allowed() {
        assert!(SignInDecision::evaluate(Some(competitor(true))).is_allowed());
        let mut shop = retailer();
        shop.approve().unwrap();
        assert!(SignInDecision::evaluate(Some(shop)).is_allowed());
    }

    #[test]
    fn inactivity_expires_strictly_after_timeout() {
        let policy = InactivityPolicy::from_minutes(30);
        let last = Timestamp::now();
        assert!(!policy.is_expired(last, last.plus(Duration::minutes(30))));
        assert!(policy.is_expired(last, last.plus(Duration::minutes(31))));
    }
}
