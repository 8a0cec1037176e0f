//! CreateCheckoutHandler - starts a day-pass purchase.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{CreateCheckoutRequest, PaymentError, PaymentProvider};

#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutResult {
    pub checkout_url: String,
}

#[derive(Debug, Clone, Error)]
#[error("Failed to create payment link. Please try again.")]
pub struct CheckoutError(pub PaymentError);

pub struct CreateCheckoutHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    clock: fn() -> Timestamp,
}

impl CreateCheckoutHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            payment_provider,
            clock: Timestamp::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(&self, cmd: CreateCheckoutCommand) -> Result<CreateCheckoutResult, CheckoutError> {
        let request = CreateCheckoutRequest {
            user_id: cmd.user_id.clone(),
            reference_number: format!("REF-{}", (self.clock)().as_unix_millis()),
        };

        let session = self
            .payment_provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                error!(user_id = %cmd.user_id, error = %e, "Checkout creation failed");
                CheckoutError(e)
            })?;

        info!(user_id = %cmd.user_id, session_id = %session.id, "Checkout session created");
        Ok(CreateCheckoutResult {
            checkout_url: session.checkout_url,
        })
    }
}
