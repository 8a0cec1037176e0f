//! AI Provider Port - text generation for the chat endpoint.
//!
//! The chat flow sends one composed prompt and expects at most one text
//! answer back. Providers must enforce a bounded timeout and report it as
//! [`AIError::Timeout`].

use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generates a reply to `prompt`.
    ///
    /// `Ok(None)` means the provider answered but produced no candidate text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, AIError>;

    /// Lists model names available to the configured credentials.
    async fn list_models(&self) -> Result<Vec<String>, AIError>;

    /// Returns false when no API key is configured.
    fn is_configured(&self) -> bool;

    fn provider_info(&self) -> ProviderInfo;
}

/// Provider name and model, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Errors from AI provider calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AIError {
    /// No API key configured.
    #[error("API Key not configured.")]
    NotConfigured,

    /// The provider returned a non-success status.
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AIError {
    /// Diagnostic detail surfaced to the caller.
    ///
    /// For provider errors this is the provider's own response body.
    pub fn detail(&self) -> String {
        match self {
            AIError::Api { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Returns true if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            AIError::Network(_) | AIError::Timeout { .. } => true,
            AIError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
