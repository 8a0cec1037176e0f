//! Mapping of application errors to HTTP responses.
//!
//! JSON endpoints answer `{"error": "..."}`. The webhook endpoint answers
//! plain text, since only the payment provider reads it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::handlers::{AdminStatsError, ChatError, CheckoutError};
use crate::domain::payment::WebhookError;
use crate::domain::subscription::AccessDeniedReason;

/// Standard JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

pub fn access_denied_status(reason: &AccessDeniedReason) -> StatusCode {
    match reason {
        AccessDeniedReason::SubscriptionExpired => StatusCode::FORBIDDEN,
        AccessDeniedReason::RateLimited => StatusCode::TOO_MANY_REQUESTS,
    }
}

pub struct ChatApiError(pub ChatError);

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ChatError::AccessDenied(reason) => {
                (access_denied_status(reason), reason.user_message().to_string())
            }
            ChatError::AccessCheckFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error during checks.".to_string(),
            ),
            ChatError::MissingMessage => (StatusCode::BAD_REQUEST, self.0.to_string()),
            ChatError::NotConfigured => (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()),
            ChatError::Upstream(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Backend Error: {}", e.detail()),
            ),
        };
        ErrorResponse::new(message).into_response_with(status)
    }
}

pub struct CheckoutApiError(pub CheckoutError);

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> Response {
        ErrorResponse::new(self.0.to_string()).into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

pub struct AdminApiError(pub AdminStatsError);

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AdminStatsError::Forbidden => {
                ErrorResponse::new("Forbidden: Admins Only").into_response_with(StatusCode::FORBIDDEN)
            }
            AdminStatsError::Storage(_) => ErrorResponse::new("Failed to fetch stats")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

pub struct WebhookApiError(pub WebhookError);

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        (self.0.status_code(), self.0.response_body()).into_response()
    }
}
