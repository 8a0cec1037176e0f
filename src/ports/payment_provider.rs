//! Payment provider port - hosted checkout sessions.
//!
//! The session must carry the caller's user id in its metadata. The
//! webhook processor relies on it to find whose pass to extend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a hosted checkout session for one day pass.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Request for a new checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutRequest {
    /// Embedded as `metadata.uid`.
    pub user_id: UserId,

    /// Merchant reference, e.g. `REF-1700000000000`.
    pub reference_number: String,
}

/// Created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for the customer to complete payment.
    pub checkout_url: String,
}

/// Payment provider error.
#[derive(Debug, Clone)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::new(
            PaymentErrorCode::Timeout,
            format!("request timed out after {}s", timeout_secs),
        )
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    pub fn not_configured() -> Self {
        Self::new(PaymentErrorCode::NotConfigured, "payment secret key not configured")
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(ErrorCode::InternalError, err.message)
            .with_detail("payment_error", err.code.to_string())
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    NetworkError,
    Timeout,
    AuthenticationError,
    ProviderError,
    NotConfigured,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError | PaymentErrorCode::Timeout)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::NotConfigured => "not_configured",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::Timeout.is_retryable());
        assert!(!PaymentErrorCode::AuthenticationError.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::timeout(30);
        assert_eq!(err.to_string(), "timeout: request timed out after 30s");
    }

    #[test]
    fn payment_error_converts_to_domain_error() {
        let domain: DomainError = PaymentError::provider("bad amount").into();
        assert_eq!(domain.code, ErrorCode::InternalError);
        assert_eq!(domain.details.get("payment_error"), Some(&"provider_error".to_string()));
    }
}
