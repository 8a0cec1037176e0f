//! Payment configuration (PayMongo)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::paymongo::{CheckoutSettings, DEFAULT_PAYMONGO_API_BASE_URL};
use crate::application::handlers::subscription::DEFAULT_PASS_PRICE;
use crate::domain::payment::DEFAULT_SIGNATURE_TOLERANCE_SECS;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Webhook signing secret (`whsk_...`)
    pub webhook_secret: Option<SecretString>,

    /// API secret key (`sk_...`) used to create checkout sessions
    pub secret_key: Option<SecretString>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Checkout API timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum webhook timestamp age in seconds; 0 disables the check
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance_secs: i64,

    /// Price of one pass, used for the admin revenue figure
    #[serde(default = "default_pass_price")]
    pub pass_price: u64,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl PaymentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Webhook secret, or an empty secret when unset.
    ///
    /// The verifier rejects every delivery when the secret is empty.
    pub fn webhook_secret(&self) -> SecretString {
        self.webhook_secret
            .clone()
            .unwrap_or_else(|| SecretString::new(String::new()))
    }

    pub fn secret_key(&self) -> SecretString {
        self.secret_key
            .clone()
            .unwrap_or_else(|| SecretString::new(String::new()))
    }

    pub fn is_live_mode(&self) -> bool {
        self.secret_key().expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_secret().expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__WEBHOOK_SECRET"));
        }
        let key = self.secret_key();
        if !key.expose_secret().is_empty() && !key.expose_secret().starts_with("sk_") {
            return Err(ValidationError::InvalidPayMongoKey);
        }
        if self.timeout_secs == 0 || self.signature_tolerance_secs < 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.checkout.amount == 0 {
            return Err(ValidationError::InvalidCheckoutAmount);
        }
        for (name, url) in [
            ("PAYMENT__API_BASE_URL", &self.api_base_url),
            ("PAYMENT__CHECKOUT__SUCCESS_URL", &self.checkout.success_url),
            ("PAYMENT__CHECKOUT__CANCEL_URL", &self.checkout.cancel_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUrl(name));
            }
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            secret_key: None,
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
            signature_tolerance_secs: default_signature_tolerance(),
            pass_price: default_pass_price(),
            checkout: CheckoutSettings::default(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_PAYMONGO_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_signature_tolerance() -> i64 {
    DEFAULT_SIGNATURE_TOLERANCE_SECS
}

fn default_pass_price() -> u64 {
    DEFAULT_PASS_PRICE
}
