//! Accounts: profiles, business approval and sign-in rules.

mod profile;
mod session;

pub use profile::{AccountType, ApprovalStatus, UserProfile, VerificationStatus};
pub use session::{
    InactivityPolicy, SignInDecision, SignOutReason, LOGIN_PATH, PENDING_APPROVAL_PATH,
    VERIFY_EMAIL_PATH,
};

#[cfg(test)]
pub(crate) use profile::tests::profile;
