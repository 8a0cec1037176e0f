//! In-memory subscription store.
//!
//! Same conditional-write semantics as the Postgres adapter, backed by a
//! `RwLock<HashMap>`. Used for local development and tests. Failures and
//! lost races can be injected to exercise error paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::subscription::{PassGrant, UserSubscription};
use crate::ports::{
    GrantSnapshot, SubscriptionReader, SubscriptionStatistics, SubscriptionStore, WriteResult,
};

#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionStore {
    records: Arc<RwLock<HashMap<UserId, UserSubscription>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    forced_conflicts: Arc<AtomicU32>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record directly.
    pub async fn insert(&self, record: UserSubscription) {
        self.records
            .write()
            .await
            .insert(record.user_id.clone(), record);
    }

    /// Returns a copy of the stored record.
    pub async fn get(&self, user_id: &UserId) -> Option<UserSubscription> {
        self.records.read().await.get(user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes the next `count` conditional writes report a conflict.
    pub fn force_conflicts(&self, count: u32) {
        self.forced_conflicts.store(count, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::database("injected read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("injected write failure"));
        }
        Ok(())
    }

    fn take_forced_conflict(&self) -> bool {
        self.forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserSubscription>, DomainError> {
        self.check_read()?;
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn apply_grant(
        &self,
        user_id: &UserId,
        expected: &GrantSnapshot,
        grant: &PassGrant,
    ) -> Result<WriteResult, DomainError> {
        self.check_write()?;
        if self.take_forced_conflict() {
            return Ok(WriteResult::Conflict);
        }

        let mut records = self.records.write().await;
        if !expected.matches(records.get(user_id)) {
            return Ok(WriteResult::Conflict);
        }

        let record = records
            .entry(user_id.clone())
            .or_insert_with(|| UserSubscription::empty(user_id.clone()));
        record.subscription_end = Some(grant.new_expiry);
        record.last_payment_id = Some(grant.payment_id.clone());
        record.is_active = true;

        Ok(WriteResult::Written)
    }

    async fn touch_last_request(
        &self,
        user_id: &UserId,
        expected: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<WriteResult, DomainError> {
        self.check_write()?;
        if self.take_forced_conflict() {
            return Ok(WriteResult::Conflict);
        }

        let mut records = self.records.write().await;
        match records.get_mut(user_id) {
            Some(record) if record.last_request_at == expected => {
                record.last_request_at = Some(now);
                Ok(WriteResult::Written)
            }
            _ => Ok(WriteResult::Conflict),
        }
    }
}

#[async_trait]
impl SubscriptionReader for InMemorySubscriptionStore {
    async fn get_statistics(&self, now: Timestamp) -> Result<SubscriptionStatistics, DomainError> {
        self.check_read()?;
        let records = self.records.read().await;
        Ok(SubscriptionStatistics {
            total_users: records.len() as u64,
            active_users: records.values().filter(|r| r.has_valid_pass(now)).count() as u64,
        })
    }
}
