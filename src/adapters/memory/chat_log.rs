//! In-memory chat log.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::{ChatLogEntry, FeatureType};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ChatLogRepository;

type LogKey = (UserId, String);

#[derive(Debug, Clone, Default)]
pub struct InMemoryChatLogRepository {
    entries: Arc<RwLock<HashMap<LogKey, Vec<ChatLogEntry>>>>,
}

impl InMemoryChatLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries logged for a user and feature, oldest first.
    pub async fn entries(&self, user_id: &UserId, feature: &FeatureType) -> Vec<ChatLogEntry> {
        self.entries
            .read()
            .await
            .get(&(user_id.clone(), feature.key().to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatLogRepository for InMemoryChatLogRepository {
    async fn append(
        &self,
        user_id: &UserId,
        feature: &FeatureType,
        entry: &ChatLogEntry,
    ) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .entry((user_id.clone(), feature.key().to_string()))
            .or_default()
            .push(entry.clone());
        Ok(())
    }
}
