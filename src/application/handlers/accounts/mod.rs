//! Account handlers.
//!
//! ## Commands
//! - Creating and editing the caller's profile
//! - The sign-in gate
//! - Admin approval, rejection and deactivation
//!
//! ## Queries
//! - The caller's profile
//! - Business accounts pending approval

mod profile;
mod review_account;
mod sign_in;

// Commands
pub use profile::{
    CreateProfileCommand, CreateProfileHandler, UpdateProfileCommand, UpdateProfileHandler,
};
pub use review_account::{
    AccountDecision, DeactivateAccountCommand, DeactivateAccountHandler, ReviewAccountCommand,
    ReviewAccountHandler,
};
pub use sign_in::{SignInCommand, SignInHandler};

// Queries
pub use profile::GetProfileHandler;
pub use review_account::ListPendingAccountsHandler;

pub(crate) use profile::load_profile;
