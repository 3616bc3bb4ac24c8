//! Email adapters implementing the `EmailSender` port.
//!
//! - `ResendEmailSender` / `PostmarkEmailSender` - HTTP providers
//! - `FailoverEmailSender` - primary with an optional secondary
//! - `MockEmailSender` - records sent messages for tests

mod failover;
mod mock;
mod postmark;
mod resend;

pub use failover::FailoverEmailSender;
pub use mock::MockEmailSender;
pub use postmark::PostmarkEmailSender;
pub use resend::ResendEmailSender;

use reqwest::StatusCode;

use crate::ports::EmailError;

/// Maps a non-success provider response onto the port error.
fn error_for_status(provider: &str, status: StatusCode, body: String) -> EmailError {
    let provider = provider.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            EmailError::AuthenticationFailed { provider }
        }
        StatusCode::TOO_MANY_REQUESTS => EmailError::RateLimited { provider },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => EmailError::Rejected {
            provider,
            message: body,
        },
        _ => EmailError::Provider {
            provider,
            message: format!("HTTP {}: {}", status.as_u16(), body),
        },
    }
}
