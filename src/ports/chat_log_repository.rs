//! Chat log port - append-only per-user, per-feature message history.

use async_trait::async_trait;

use crate::domain::chat::{ChatLogEntry, FeatureType};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    /// Appends `entry` to the user's log for `feature`.
    async fn append(
        &self,
        user_id: &UserId,
        feature: &FeatureType,
        entry: &ChatLogEntry,
    ) -> Result<(), DomainError>;
}
