//! Subscription store port - durable per-user day-pass records.
//!
//! Writers never lock. Each write is conditional on the fields the writer
//! read, and reports [`WriteResult::Conflict`] when another writer got there
//! first. Callers decide whether to re-read and retry.
//!
//! The payment path writes only grant fields and the access gate writes only
//! `last_request_at`, so the two never conflict with each other.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId, Timestamp, UserId};
use crate::domain::subscription::{PassGrant, UserSubscription};

/// Grant fields as a writer last saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSnapshot {
    /// Whether a record existed at all.
    pub exists: bool,
    pub last_payment_id: Option<PaymentId>,
    pub subscription_end: Option<Timestamp>,
}

impl GrantSnapshot {
    /// Captures the grant fields of a freshly read record.
    pub fn of(record: Option<&UserSubscription>) -> Self {
        match record {
            Some(r) => Self {
                exists: true,
                last_payment_id: r.last_payment_id.clone(),
                subscription_end: r.subscription_end,
            },
            None => Self {
                exists: false,
                last_payment_id: None,
                subscription_end: None,
            },
        }
    }

    /// Returns true if `record` still carries exactly these grant fields.
    pub fn matches(&self, record: Option<&UserSubscription>) -> bool {
        *self == Self::of(record)
    }
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    /// The stored fields no longer matched the expected values.
    Conflict,
}

impl WriteResult {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteResult::Written)
    }
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Loads the user's record, if any.
    async fn find(&self, user_id: &UserId) -> Result<Option<UserSubscription>, DomainError>;

    /// Merges `grant` into the user's record when its grant fields still
    /// equal `expected`.
    ///
    /// Sets `subscription_end`, `last_payment_id` and `is_active = true`;
    /// `last_request_at` is preserved. Creates the record when
    /// `expected.exists` is false and no record exists yet.
    async fn apply_grant(
        &self,
        user_id: &UserId,
        expected: &GrantSnapshot,
        grant: &PassGrant,
    ) -> Result<WriteResult, DomainError>;

    /// Sets `last_request_at = now` on an existing record when the stored
    /// value still equals `expected`.
    async fn touch_last_request(
        &self,
        user_id: &UserId,
        expected: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<WriteResult, DomainError>;
}

/// Aggregate counts over all records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionStatistics {
    pub total_users: u64,
    /// Records whose pass expires strictly after the query instant.
    pub active_users: u64,
}

/// Read-only aggregate queries for the admin dashboard.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    async fn get_statistics(&self, now: Timestamp) -> Result<SubscriptionStatistics, DomainError>;
}
