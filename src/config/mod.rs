//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `DISKARTE` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use diskarte::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use ai::AiConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; in-memory storage when no URL is set
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Firebase identity and the admin allow-list
    #[serde(default)]
    pub auth: AuthConfig,

    /// Gemini LLM
    #[serde(default)]
    pub ai: AiConfig,

    /// PayMongo webhooks and checkout
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables with the `DISKARTE`
    /// prefix:
    ///
    /// - `DISKARTE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DISKARTE__PAYMENT__WEBHOOK_SECRET=...` -> `payment.webhook_secret`
    /// - `DISKARTE__PAYMENT__CHECKOUT__AMOUNT=100` -> `payment.checkout.amount`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DISKARTE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("payment.checkout.image_urls")
                    .with_list_parse_key("payment.checkout.payment_method_types"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.ai.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DISKARTE__AUTH__FIREBASE_PROJECT_ID",
        "DISKARTE__AUTH__ADMIN_USER_IDS",
        "DISKARTE__PAYMENT__WEBHOOK_SECRET",
        "DISKARTE__PAYMENT__SECRET_KEY",
        "DISKARTE__PAYMENT__PASS_PRICE",
        "DISKARTE__SERVER__PORT",
        "DISKARTE__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var("DISKARTE__AUTH__FIREBASE_PROJECT_ID", "diskarte-ai");
        env::set_var("DISKARTE__PAYMENT__WEBHOOK_SECRET", "whsk_test");
        env::set_var("DISKARTE__PAYMENT__SECRET_KEY", "sk_test_xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (k, v) in extra {
            env::set_var(k, v);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.auth.firebase_project_id, "diskarte-ai");
        assert_eq!(config.payment.webhook_secret().expose_secret(), "whsk_test");
        assert!(config.database.url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_overrides() {
        let config = load_with(&[
            ("DISKARTE__SERVER__PORT", "3000"),
            ("DISKARTE__SERVER__ENVIRONMENT", "production"),
            ("DISKARTE__PAYMENT__PASS_PRICE", "75"),
            ("DISKARTE__AUTH__ADMIN_USER_IDS", "owner-uid"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.payment.pass_price, 75);
        assert!(!config.auth.admin_allow_list().is_empty());
    }
}
