//! PostgreSQL implementation of SubscriptionStore and SubscriptionReader.
//!
//! Conditional writes are single `UPDATE ... WHERE` statements comparing the
//! expected columns with `IS NOT DISTINCT FROM`, so NULL matches NULL. The
//! first grant for a user is an `INSERT ... ON CONFLICT DO NOTHING`; losing
//! that race reports a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, PaymentId, Timestamp, UserId};
use crate::domain::subscription::{PassGrant, UserSubscription};
use crate::ports::{
    GrantSnapshot, SubscriptionReader, SubscriptionStatistics, SubscriptionStore, WriteResult,
};

#[derive(Clone)]
pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: String,
    subscription_end_timestamp: Option<DateTime<Utc>>,
    last_payment_id: Option<String>,
    is_active: bool,
    last_request_timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for UserSubscription {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id)
            .map_err(|e| DomainError::database(format!("Invalid user_id: {}", e)))?;
        // A blank stored payment id is treated as none.
        let last_payment_id = row
            .last_payment_id
            .and_then(|id| PaymentId::new(id).ok());

        Ok(UserSubscription {
            user_id,
            subscription_end: row.subscription_end_timestamp.map(Timestamp::from_datetime),
            last_payment_id,
            is_active: row.is_active,
            last_request_at: row.last_request_timestamp.map(Timestamp::from_datetime),
        })
    }
}

fn written_if(rows_affected: u64) -> WriteResult {
    if rows_affected == 1 {
        WriteResult::Written
    } else {
        WriteResult::Conflict
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserSubscription>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, subscription_end_timestamp, last_payment_id, is_active,
                   last_request_timestamp
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load user: {}", e)))?;

        row.map(UserSubscription::try_from).transpose()
    }

    async fn apply_grant(
        &self,
        user_id: &UserId,
        expected: &GrantSnapshot,
        grant: &PassGrant,
    ) -> Result<WriteResult, DomainError> {
        let result = if expected.exists {
            sqlx::query(
                r#"
                UPDATE users SET
                    subscription_end_timestamp = $2,
                    last_payment_id = $3,
                    is_active = TRUE,
                    updated_at = NOW()
                WHERE user_id = $1
                  AND last_payment_id IS NOT DISTINCT FROM $4
                  AND subscription_end_timestamp IS NOT DISTINCT FROM $5
                "#,
            )
            .bind(user_id.as_str())
            .bind(grant.new_expiry.as_datetime())
            .bind(grant.payment_id.as_str())
            .bind(expected.last_payment_id.as_ref().map(|p| p.as_str()))
            .bind(expected.subscription_end.map(|t| *t.as_datetime()))
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, subscription_end_timestamp, last_payment_id, is_active)
                VALUES ($1, $2, $3, TRUE)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(user_id.as_str())
            .bind(grant.new_expiry.as_datetime())
            .bind(grant.payment_id.as_str())
            .execute(&self.pool)
            .await
        }
        .map_err(|e| DomainError::database(format!("Failed to apply grant: {}", e)))?;

        Ok(written_if(result.rows_affected()))
    }

    async fn touch_last_request(
        &self,
        user_id: &UserId,
        expected: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<WriteResult, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                last_request_timestamp = $2,
                updated_at = NOW()
            WHERE user_id = $1
              AND last_request_timestamp IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .bind(expected.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update last request: {}", e)))?;

        Ok(written_if(result.rows_affected()))
    }
}

#[async_trait]
impl SubscriptionReader for PostgresSubscriptionStore {
    async fn get_statistics(&self, now: Timestamp) -> Result<SubscriptionStatistics, DomainError> {
        let (total, active): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE subscription_end_timestamp > $1)
            FROM users
            "#,
        )
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count users: {}", e)))?;

        Ok(SubscriptionStatistics {
            total_users: total.max(0) as u64,
            active_users: active.max(0) as u64,
        })
    }
}
