//! Business subscriptions and saved cards.

use std::sync::Arc;

use crate::application::handlers::accounts::load_profile;
use crate::application::Actor;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{PaymentMethod, PaymentProvider, ProfileRepository, Subscription};

/// Requested change to a business subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    ChangePrice { price_id: String },
    Cancel { at_period_end: bool },
}

#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub actor: Actor,
    pub change: SubscriptionChange,
}

/// Handler for a business account changing or cancelling its own plan.
pub struct UpdateSubscriptionHandler {
    profiles: Arc<dyn ProfileRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl UpdateSubscriptionHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self { profiles, provider }
    }

    pub async fn handle(&self, cmd: UpdateSubscriptionCommand) -> Result<Subscription, DomainError> {
        // 1. Business account with a subscription on file
        let mut profile = load_profile(self.profiles.as_ref(), &cmd.actor.user_id).await?;
        if !profile.account_type.is_business() {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Subscriptions are only available to business accounts",
            ));
        }
        let subscription_id = profile.subscription_id.clone().ok_or_else(|| {
            DomainError::validation("subscription_id", "Account has no active subscription")
        })?;

        // 2. Apply the change at the processor
        let subscription = match &cmd.change {
            SubscriptionChange::ChangePrice { price_id } => {
                if price_id.trim().is_empty() {
                    return Err(DomainError::validation("price_id", "Price is required"));
                }
                self.provider
                    .update_subscription(&subscription_id, price_id)
                    .await?
            }
            SubscriptionChange::Cancel { at_period_end } => {
                self.provider
                    .cancel_subscription(&subscription_id, *at_period_end)
                    .await?
            }
        };

        // 3. An immediate cancellation detaches the subscription
        if matches!(cmd.change, SubscriptionChange::Cancel { at_period_end: false }) {
            profile.subscription_id = None;
            profile.updated_at = Timestamp::now();
            self.profiles.update(&profile).await?;
        }

        tracing::info!(
            user_id = %profile.id,
            subscription_id = %subscription.id,
            status = ?subscription.status,
            "Subscription updated"
        );
        Ok(subscription)
    }
}

/// Saved cards for the caller's processor customer. Empty when no customer
/// has been created yet.
pub struct ListPaymentMethodsHandler {
    profiles: Arc<dyn ProfileRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl ListPaymentMethodsHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self { profiles, provider }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<Vec<PaymentMethod>, DomainError> {
        let profile = load_profile(self.profiles.as_ref(), &user_id).await?;
        match profile.payment_customer_id {
            Some(customer_id) => Ok(self.provider.list_payment_methods(&customer_id).await?),
            None => Ok(Vec::new()),
        }
    }
}
