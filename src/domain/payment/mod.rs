//! Payment module - PayMongo webhook authentication and event shape.

mod event;
mod outcome;
mod signature;
mod webhook_errors;

pub use event::{PayMongoEvent, PAYMENT_PAID};
pub use outcome::WebhookOutcome;
pub use signature::{
    sign_webhook_payload, PayMongoWebhookVerifier, SignatureError, SignatureHeader, SigningMode,
    DEFAULT_SIGNATURE_TOLERANCE_SECS,
};
pub use webhook_errors::WebhookError;
