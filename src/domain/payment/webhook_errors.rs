//! Webhook error types.
//!
//! Status codes drive PayMongo's redelivery: 2xx and 4xx stop retries,
//! 5xx asks for another attempt.

use axum::http::StatusCode;
use thiserror::Error;

use super::SignatureError;

/// Errors that end webhook processing without an acknowledgement.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The delivery could not be authenticated.
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// Authenticated body is not a JSON event.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A `payment.paid` event without a payment id.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Reading or writing the subscription record failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Concurrent writers kept winning the conditional write.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl WebhookError {
    /// Returns true if the provider should redeliver.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Storage(_) | WebhookError::Conflict(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,
            WebhookError::Storage(_) | WebhookError::Conflict(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text body returned to the provider.
    pub fn response_body(&self) -> &'static str {
        match self {
            WebhookError::InvalidSignature(_) => "Unauthorized",
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => "Bad Request",
            WebhookError::Storage(_) | WebhookError::Conflict(_) => "Database Error",
        }
    }
}
