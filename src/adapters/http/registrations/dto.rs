//! Request and response DTOs for registration endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::application::handlers::payments::CreatePaymentIntentResult;
use crate::domain::foundation::{EventId, UserId};
use crate::domain::payment::Payment;
use crate::domain::registration::RegistrationStatus;

/// Query string for `GET /api/registrations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRegistrationsParams {
    pub event_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<RegistrationStatus>,
}

impl ListRegistrationsParams {
    pub fn event_id(&self) -> Result<Option<EventId>, ApiError> {
        self.event_id
            .as_deref()
            .map(|raw| parse_id("event_id", raw))
            .transpose()
    }

    pub fn user_id(&self) -> Result<Option<UserId>, ApiError> {
        self.user_id
            .as_deref()
            .map(|raw| parse_id("user_id", raw))
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentResponse {
    pub payment: Payment,
    pub client_secret: String,
}

impl From<CreatePaymentIntentResult> for PaymentIntentResponse {
    fn from(result: CreatePaymentIntentResult) -> Self {
        Self {
            payment: result.payment,
            client_secret: result.client_secret,
        }
    }
}
