//! Mock AI Provider for testing.
//!
//! Returns queued replies in order, records every prompt, and can simulate
//! a missing API key or a failing model listing.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Kaya mo yan!")
//!     .with_error(AIError::Timeout { timeout_secs: 30 });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, ProviderInfo};

type Reply = Result<Option<String>, AIError>;

#[derive(Debug, Clone)]
pub struct MockAIProvider {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    models: Arc<Mutex<Result<Vec<String>, AIError>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    configured: bool,
    delay: Duration,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            models: Arc::new(Mutex::new(Ok(vec!["models/mock-model".to_string()]))),
            prompts: Arc::new(Mutex::new(Vec::new())),
            configured: true,
            delay: Duration::ZERO,
        }
    }

    /// Queues a text reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(Ok(Some(text.into())));
        self
    }

    /// Queues a reply with no candidate text.
    pub fn with_empty_response(self) -> Self {
        lock(&self.replies).push_back(Ok(None));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: AIError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Sets the result of `list_models`.
    pub fn with_models(self, models: Result<Vec<String>, AIError>) -> Self {
        *lock(&self.models) = models;
        self
    }

    /// Simulates a missing API key.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, AIError> {
        lock(&self.prompts).push(prompt.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = lock(&self.replies).pop_front();
        next.unwrap_or_else(|| Ok(Some("Mock response".to_string())))
    }

    async fn list_models(&self) -> Result<Vec<String>, AIError> {
        lock(&self.models).clone()
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model")
    }
}
