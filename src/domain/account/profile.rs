//! User profiles and account types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    str_enum, DomainError, ErrorCode, Timestamp, UserId, ValidationError,
};
use crate::domain::registration::is_plausible_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Competitor,
    Retailer,
    Manufacturer,
    Organizer,
    Admin,
}

str_enum!(AccountType {
    Competitor => "competitor",
    Retailer => "retailer",
    Manufacturer => "manufacturer",
    Organizer => "organizer",
    Admin => "admin",
});

impl AccountType {
    /// Business accounts need manual approval before they can sign in.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            AccountType::Retailer | AccountType::Manufacturer | AccountType::Organizer
        )
    }

    /// Accounts that may create and run events.
    pub fn can_organize(&self) -> bool {
        matches!(self, AccountType::Organizer | AccountType::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
}

str_enum!(VerificationStatus {
    Pending => "pending",
    Verified => "verified",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Non-business accounts.
    NotRequired,
    Pending,
    Approved,
    Rejected,
}

str_enum!(ApprovalStatus {
    NotRequired => "not_required",
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// Profile row keyed by the auth provider subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    /// Trading name for business accounts.
    pub company_name: Option<String>,
    pub account_type: AccountType,
    pub verification_status: VerificationStatus,
    pub approval_status: ApprovalStatus,
    pub is_active: bool,
    /// Payment-provider customer, created lazily.
    pub payment_customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    /// Creates the profile for a freshly signed-up user.
    ///
    /// Admin accounts cannot be self-provisioned.
    pub fn sign_up(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        account_type: AccountType,
        email_verified: bool,
    ) -> Result<Self, DomainError> {
        if account_type == AccountType::Admin {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Admin accounts cannot be self-provisioned",
            ));
        }
        let email = email.into().trim().to_ascii_lowercase();
        if !is_plausible_email(&email) {
            return Err(ValidationError::invalid_format("email", "not an email address").into());
        }
        let now = Timestamp::now();
        Ok(Self {
            id,
            email,
            display_name,
            phone: None,
            company_name: None,
            account_type,
            verification_status: if email_verified {
                VerificationStatus::Verified
            } else {
                VerificationStatus::Pending
            },
            approval_status: if account_type.is_business() {
                ApprovalStatus::Pending
            } else {
                ApprovalStatus::NotRequired
            },
            is_active: true,
            payment_customer_id: None,
            subscription_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin && self.is_active
    }

    /// True once the auth provider has confirmed the address.
    pub fn mark_verified(&mut self) -> bool {
        if self.verification_status == VerificationStatus::Verified {
            return false;
        }
        self.verification_status = VerificationStatus::Verified;
        self.touch();
        true
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.decide(ApprovalStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), DomainError> {
        self.decide(ApprovalStatus::Rejected)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    fn decide(&mut self, decision: ApprovalStatus) -> Result<(), DomainError> {
        if self.approval_status != ApprovalStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Account approval is {}, not pending",
                    self.approval_status
                ),
            ));
        }
        self.approval_status = decision;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn profile(id: &str, account_type: AccountType) -> UserProfile {
        let mut profile = UserProfile::sign_up(
            UserId::new(id).unwrap(),
            format!("{}@example.com", id),
            None,
            AccountType::Competitor,
            true,
        )
        .unwrap();
        profile.account_type = account_type;
        if account_type.is_business() {
            profile.approval_status = ApprovalStatus::Approved;
        }
        profile
    }

    #[test]
    fn business_sign_up_requires_approval() {
        let profile = UserProfile::sign_up(
            UserId::new("shop-1").unwrap(),
            "owner@bassshop.com",
            None,
            AccountType::Retailer,
            true,
        )
        .unwrap();
        assert_eq!(profile.approval_status, ApprovalStatus::Pending);
    }

    #[test]
    fn competitor_sign_up_needs_no_approval() {
        let profile = UserProfile::sign_up(
            UserId::new("comp-1").unwrap(),
            "Comp@Example.com",
            None,
            AccountType::Competitor,
            false,
        )
        .unwrap();
        assert_eq!(profile.approval_status, ApprovalStatus::NotRequired);
        assert_eq!(profile.verification_status, VerificationStatus::Pending);
        assert_eq!(profile.email, "comp@example.com");
    }

    #[test]
    fn admin_cannot_self_provision() {
        let err = UserProfile::sign_up(
            UserId::new("x").unwrap(),
            "x@example.com",
            None,
            AccountType::Admin,
            true,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn approval_decisions_only_apply_while_pending() {
        let mut profile = UserProfile::sign_up(
            UserId::new("org-1").unwrap(),
            "org@example.com",
            None,
            AccountType::Organizer,
            true,
        )
        .unwrap();
        profile.approve().unwrap();
        assert!(profile.reject().is_err());
        assert_eq!(profile.approval_status, ApprovalStatus::Approved);
    }

    #[test]
    fn mark_verified_reports_change_once() {
        let mut profile = UserProfile::sign_up(
            UserId::new("comp-1").unwrap(),
            "comp@example.com",
            None,
            AccountType::Competitor,
            false,
        )
        .unwrap();
        assert!(profile.mark_verified());
        assert!(!profile.mark_verified());
    }

    #[test]
    fn deactivated_admin_loses_admin_rights() {
        let mut admin = profile("admin-1", AccountType::Admin);
        assert!(admin.is_admin());
        admin.deactivate();
        assert!(!admin.is_admin());
    }
}
