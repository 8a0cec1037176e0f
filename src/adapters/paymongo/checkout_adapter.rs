//! PayMongo checkout adapter.
//!
//! Creates hosted checkout sessions through `POST /v1/checkout_sessions`,
//! authenticated with HTTP basic auth using the secret key as username.
//! The caller's user id is sent as `metadata.uid`; the webhook processor
//! reads it back from `payment.paid` events.
//!
//! # Configuration
//!
//! ```ignore
//! let config = PayMongoConfig::new(secret_key, CheckoutSettings::default());
//! let adapter = PayMongoCheckoutAdapter::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};

pub const DEFAULT_PAYMONGO_API_BASE_URL: &str = "https://api.paymongo.com";

/// Line item and redirect settings for the day-pass checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    pub currency: String,
    /// Amount in centavos.
    pub amount: u64,
    pub item_name: String,
    pub item_description: String,
    pub image_urls: Vec<String>,
    pub payment_method_types: Vec<String>,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: "PHP".to_string(),
            amount: 100,
            item_name: "Day Pass".to_string(),
            item_description: "Diskarte AI Day Pass (24 Hours)".to_string(),
            image_urls: vec!["https://diskarte-ai.web.app/icons/Icon-192.png".to_string()],
            payment_method_types: ["gcash", "paymaya", "card", "grab_pay"]
                .into_iter()
                .map(String::from)
                .collect(),
            description: "Diskarte AI Subscription".to_string(),
            success_url: "https://diskarte-ai.web.app/#/success".to_string(),
            cancel_url: "https://diskarte-ai.web.app/#/cancel".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct PayMongoConfig {
    secret_key: SecretString,
    pub api_base_url: String,
    pub timeout: Duration,
    pub checkout: CheckoutSettings,
}

impl PayMongoConfig {
    pub fn new(secret_key: SecretString, checkout: CheckoutSettings) -> Self {
        Self {
            secret_key,
            api_base_url: DEFAULT_PAYMONGO_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            checkout,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct PayMongoCheckoutAdapter {
    config: PayMongoConfig,
    client: Client,
}

impl PayMongoCheckoutAdapter {
    pub fn new(config: PayMongoConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn checkout_url(&self) -> String {
        format!(
            "{}/v1/checkout_sessions",
            self.config.api_base_url.trim_end_matches('/')
        )
    }

    fn build_body(&self, request: &CreateCheckoutRequest) -> CheckoutSessionBody {
        let settings = &self.config.checkout;
        CheckoutSessionBody {
            data: CheckoutSessionData {
                attributes: CheckoutSessionAttributes {
                    line_items: vec![LineItem {
                        currency: settings.currency.clone(),
                        amount: settings.amount,
                        description: settings.item_description.clone(),
                        name: settings.item_name.clone(),
                        quantity: 1,
                        images: settings.image_urls.clone(),
                    }],
                    payment_method_types: settings.payment_method_types.clone(),
                    description: settings.description.clone(),
                    success_url: settings.success_url.clone(),
                    cancel_url: settings.cancel_url.clone(),
                    reference_number: request.reference_number.clone(),
                    metadata: CheckoutMetadata {
                        uid: request.user_id.as_str().to_string(),
                    },
                },
            },
        }
    }
}

#[async_trait]
impl PaymentProvider for PayMongoCheckoutAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let secret = self.config.secret_key.expose_secret();
        if secret.is_empty() {
            return Err(PaymentError::not_configured());
        }

        let response = self
            .client
            .post(self.checkout_url())
            .basic_auth(secret, Option::<&str>::None)
            .json(&self.build_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::timeout(self.config.timeout.as_secs())
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %error_text, "PayMongo create_checkout_session failed");
            let code = if status == reqwest::StatusCode::UNAUTHORIZED {
                PaymentErrorCode::AuthenticationError
            } else {
                PaymentErrorCode::ProviderError
            };
            return Err(PaymentError::new(
                code,
                format!("PayMongo API error: {}", error_text),
            ));
        }

        let created: CheckoutSessionResponse = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse PayMongo response: {}", e))
        })?;

        Ok(CheckoutSession {
            id: created.data.id,
            checkout_url: created.data.attributes.checkout_url,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// PayMongo wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct CheckoutSessionBody {
    data: CheckoutSessionData,
}

#[derive(Debug, Serialize)]
struct CheckoutSessionData {
    attributes: CheckoutSessionAttributes,
}

#[derive(Debug, Serialize)]
struct CheckoutSessionAttributes {
    line_items: Vec<LineItem>,
    payment_method_types: Vec<String>,
    description: String,
    success_url: String,
    cancel_url: String,
    reference_number: String,
    metadata: CheckoutMetadata,
}

#[derive(Debug, Serialize)]
struct LineItem {
    currency: String,
    amount: u64,
    description: String,
    name: String,
    quantity: u32,
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckoutMetadata {
    uid: String,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    data: CreatedSession,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    id: String,
    attributes: CreatedSessionAttributes,
}

#[derive(Debug, Deserialize)]
struct CreatedSessionAttributes {
    checkout_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn adapter(secret: &str) -> PayMongoCheckoutAdapter {
        PayMongoCheckoutAdapter::new(PayMongoConfig::new(
            SecretString::new(secret.to_string()),
            CheckoutSettings::default(),
        ))
        .unwrap()
    }

    fn request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            user_id: UserId::new("user-1").unwrap(),
            reference_number: "REF-1700000000000".to_string(),
        }
    }

    #[test]
    fn body_embeds_uid_and_reference() {
        let body = serde_json::to_value(adapter("sk_test").build_body(&request())).unwrap();
        let attrs = &body["data"]["attributes"];

        assert_eq!(attrs["metadata"]["uid"], "user-1");
        assert_eq!(attrs["reference_number"], "REF-1700000000000");
        assert_eq!(attrs["line_items"][0]["quantity"], 1);
        assert_eq!(attrs["line_items"][0]["currency"], "PHP");
        assert_eq!(attrs["payment_method_types"][0], "gcash");
    }

    #[test]
    fn checkout_url_uses_base() {
        let a = PayMongoCheckoutAdapter::new(
            PayMongoConfig::new(SecretString::new("sk".to_string()), CheckoutSettings::default())
                .with_api_base_url("http://localhost:4010/"),
        )
        .unwrap();
        assert_eq!(a.checkout_url(), "http://localhost:4010/v1/checkout_sessions");
    }

    #[test]
    fn response_parses_checkout_url() {
        let parsed: CheckoutSessionResponse = serde_json::from_str(
            r#"{"data":{"id":"cs_123","type":"checkout_session","attributes":{"checkout_url":"https://checkout.paymongo.com/cs_123","status":"active"}}}"#,
        )
        .unwrap();
        assert_eq!(parsed.data.id, "cs_123");
        assert_eq!(
            parsed.data.attributes.checkout_url,
            "https://checkout.paymongo.com/cs_123"
        );
    }

    #[tokio::test]
    async fn empty_secret_is_not_configured() {
        let err = adapter("").create_checkout_session(request()).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::NotConfigured);
    }
}
