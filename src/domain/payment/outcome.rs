//! Acknowledged webhook outcomes.

use crate::domain::foundation::{PaymentId, Timestamp, UserId};
use crate::domain::subscription::GrantBasis;

/// Result of a delivery that the provider should not retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Not a `payment.paid` event; nothing was written.
    Ignored { event_type: Option<String> },

    /// `payment.paid` without a user id in its metadata.
    MissingUser { payment_id: Option<PaymentId> },

    /// The payment id was already applied to this user.
    AlreadyProcessed {
        user_id: UserId,
        payment_id: PaymentId,
    },

    /// The pass was extended.
    Applied {
        user_id: UserId,
        payment_id: PaymentId,
        new_expiry: Timestamp,
        basis: GrantBasis,
    },
}

impl WebhookOutcome {
    /// Plain-text acknowledgement body.
    pub fn response_body(&self) -> &'static str {
        match self {
            WebhookOutcome::Ignored { .. } => "Ignored",
            WebhookOutcome::MissingUser { .. } => "No UID",
            WebhookOutcome::AlreadyProcessed { .. } => "Already Processed",
            WebhookOutcome::Applied { .. } => "Success",
        }
    }

    /// True for acknowledged deliveries that still indicate an upstream anomaly.
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            WebhookOutcome::MissingUser { .. } | WebhookOutcome::Ignored { event_type: None }
        )
    }
}
