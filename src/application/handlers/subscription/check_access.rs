//! CheckAccessHandler - the subscription gate for protected actions.
//!
//! Registered callers need a running pass and must wait at least five
//! seconds between allowed actions. Allowing stamps `last_request_at` with a
//! conditional write; losing that race counts as a rate-limit hit.
//! Anonymous (trial) callers bypass the gate.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, IdentityClass, Timestamp, UserId};
use crate::domain::subscription::{evaluate_access, AccessDecision, AccessDeniedReason};
use crate::ports::{SubscriptionStore, WriteResult};

/// Query to check whether a caller may perform a protected action.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
    pub identity_class: IdentityClass,
}

/// Result of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAccessResult {
    Allowed,
    Denied(AccessDeniedReason),
}

impl CheckAccessResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, CheckAccessResult::Allowed)
    }
}

/// The gate could not decide; the protected action must not run.
#[derive(Debug, Clone, Error)]
#[error("access check failed: {0}")]
pub struct AccessCheckError(pub String);

impl From<DomainError> for AccessCheckError {
    fn from(err: DomainError) -> Self {
        Self(err.to_string())
    }
}

pub struct CheckAccessHandler {
    store: Arc<dyn SubscriptionStore>,
    clock: fn() -> Timestamp,
}

impl CheckAccessHandler {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            store,
            clock: Timestamp::now,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<CheckAccessResult, AccessCheckError> {
        if query.identity_class.bypasses_subscription_gate() {
            debug!(user_id = %query.user_id, "Anonymous user, skipping subscription checks");
            return Ok(CheckAccessResult::Allowed);
        }

        let now = (self.clock)();
        let record = self.store.find(&query.user_id).await?;

        match evaluate_access(record.as_ref(), now) {
            AccessDecision::AllowWithoutTouch => {
                info!(user_id = %query.user_id, "No subscription record, treating as trial");
                Ok(CheckAccessResult::Allowed)
            }
            AccessDecision::Deny(reason) => {
                warn!(user_id = %query.user_id, reason = %reason, "Protected action denied");
                Ok(CheckAccessResult::Denied(reason))
            }
            AccessDecision::AllowAndTouch => {
                let previous = record.and_then(|r| r.last_request_at);
                match self
                    .store
                    .touch_last_request(&query.user_id, previous, now)
                    .await?
                {
                    WriteResult::Written => Ok(CheckAccessResult::Allowed),
                    WriteResult::Conflict => {
                        warn!(user_id = %query.user_id, "Concurrent request won the rate-limit slot");
                        Ok(CheckAccessResult::Denied(AccessDeniedReason::RateLimited))
                    }
                }
            }
        }
    }
}
