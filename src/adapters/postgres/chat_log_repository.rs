//! PostgreSQL implementation of ChatLogRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::chat::{ChatLogEntry, FeatureType};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ChatLogRepository;

#[derive(Clone)]
pub struct PostgresChatLogRepository {
    pool: PgPool,
}

impl PostgresChatLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatLogRepository for PostgresChatLogRepository {
    async fn append(
        &self,
        user_id: &UserId,
        feature: &FeatureType,
        entry: &ChatLogEntry,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, user_id, feature_type, content, sender, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_str())
        .bind(feature.key())
        .bind(&entry.content)
        .bind(entry.sender.as_str())
        .bind(entry.timestamp.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to append chat message: {}", e)))?;

        Ok(())
    }
}
