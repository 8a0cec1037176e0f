//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::AdminAllowList;

/// Authentication configuration (Firebase ID tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Firebase project id; used as token audience and issuer suffix
    #[serde(default)]
    pub firebase_project_id: String,

    /// User ids allowed to read admin stats (comma-separated)
    pub admin_user_ids: Option<String>,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    pub fn admin_allow_list(&self) -> AdminAllowList {
        AdminAllowList::from_ids(
            self.admin_user_ids
                .as_deref()
                .unwrap_or_default()
                .split(','),
        )
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.firebase_project_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__FIREBASE_PROJECT_ID"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            firebase_project_id: String::new(),
            admin_user_ids: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
