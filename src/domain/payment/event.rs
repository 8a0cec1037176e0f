//! PayMongo webhook event envelope.
//!
//! Only a handful of paths matter:
//!
//! ```text
//! data.attributes.type                              event type
//! data.attributes.data.id                           payment id
//! data.attributes.data.attributes.metadata.uid      paying user
//! ```
//!
//! The body is walked as untyped JSON. Any level may be missing or carry an
//! unexpected type; such fields read as absent so unrelated event shapes can
//! still be acknowledged. Only a body that is not JSON at all is rejected.

use serde_json::Value;

use crate::domain::foundation::{PaymentId, UserId};

use super::WebhookError;

/// Event type that triggers a pass grant.
pub const PAYMENT_PAID: &str = "payment.paid";

#[derive(Debug, Clone)]
pub struct PayMongoEvent {
    body: Value,
}

impl PayMongoEvent {
    /// Parses the raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body)
            .map(|body| Self { body })
            .map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    fn attributes(&self) -> Option<&Value> {
        self.body.get("data")?.get("attributes")
    }

    fn resource(&self) -> Option<&Value> {
        self.attributes()?.get("data")
    }

    /// Event identifier, used for logging only.
    pub fn event_id(&self) -> Option<&str> {
        self.body.get("data")?.get("id")?.as_str()
    }

    /// `data.attributes.type`.
    pub fn event_type(&self) -> Option<&str> {
        self.attributes()?.get("type")?.as_str()
    }

    pub fn is_payment_paid(&self) -> bool {
        self.event_type() == Some(PAYMENT_PAID)
    }

    /// `data.attributes.data.id`, if it is a non-blank string.
    pub fn payment_id(&self) -> Option<PaymentId> {
        PaymentId::new(self.resource()?.get("id")?.as_str()?).ok()
    }

    /// `data.attributes.data.attributes.metadata.uid`, if it is a non-blank
    /// string.
    pub fn user_id(&self) -> Option<UserId> {
        let uid = self
            .resource()?
            .get("attributes")?
            .get("metadata")?
            .get("uid")?
            .as_str()?;
        UserId::new(uid).ok()
    }
}
