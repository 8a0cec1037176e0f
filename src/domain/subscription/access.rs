//! Access rule for protected actions.
//!
//! A registered caller may perform a protected action when their pass is
//! still running and at least [`RATE_LIMIT_INTERVAL_SECS`] have passed since
//! the last allowed action. Allowing stamps `last_request_at`.

use crate::domain::foundation::Timestamp;
use serde::Serialize;
use thiserror::Error;

use super::{SubscriptionStatus, UserSubscription};

/// Minimum interval between two allowed protected actions.
pub const RATE_LIMIT_INTERVAL_SECS: i64 = 5;

/// Reason a protected action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum AccessDeniedReason {
    /// No pass, or the pass expired at or before now.
    #[error("subscription expired")]
    SubscriptionExpired,

    /// Called again within the minimum interval.
    #[error("rate limited")]
    RateLimited,
}

impl AccessDeniedReason {
    /// Message shown to the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            AccessDeniedReason::SubscriptionExpired => "Subscription expired. Please reload.",
            AccessDeniedReason::RateLimited => "Too many requests. Please wait 5 seconds.",
        }
    }
}

/// What the gate should do for a record at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// No record exists; allow and write nothing.
    AllowWithoutTouch,
    /// Allow and stamp `last_request_at = now`.
    AllowAndTouch,
    /// Deny for the given reason.
    Deny(AccessDeniedReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, AccessDecision::Deny(_))
    }
}

/// Evaluates the access rule for `record` at `now`.
pub fn evaluate_access(record: Option<&UserSubscription>, now: Timestamp) -> AccessDecision {
    let status = SubscriptionStatus::of(record, now);
    let Some(record) = record else {
        return AccessDecision::AllowWithoutTouch;
    };

    // Inactive and Expired both read as a lapsed pass to the caller.
    if !status.has_access() {
        return AccessDecision::Deny(AccessDeniedReason::SubscriptionExpired);
    }

    if let Some(last) = record.last_request_at {
        let elapsed = now.duration_since(&last);
        if elapsed < chrono::Duration::seconds(RATE_LIMIT_INTERVAL_SECS) {
            return AccessDecision::Deny(AccessDeniedReason::RateLimited);
        }
    }

    AccessDecision::AllowAndTouch
}
