//! UserSubscription record and its derived status.
//!
//! One record exists per user, keyed by user id. The record is created
//! implicitly on the first applied payment and is never deleted.
//!
//! # Invariants
//!
//! - `subscription_end` never decreases across distinct applied payments
//! - a given `last_payment_id` is applied at most once per user
//! - `last_request_at` only moves forward, and only when the gate allows

use crate::domain::foundation::{PaymentId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Per-user subscription state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubscription {
    /// User who owns this record.
    pub user_id: UserId,

    /// Moment the current pass expires. `None` means never subscribed.
    #[serde(rename = "subscription_end_timestamp")]
    pub subscription_end: Option<Timestamp>,

    /// Last payment successfully applied to this record.
    pub last_payment_id: Option<PaymentId>,

    /// True once any payment has been applied.
    pub is_active: bool,

    /// Moment of the last allowed protected action.
    #[serde(rename = "last_request_timestamp")]
    pub last_request_at: Option<Timestamp>,
}

impl UserSubscription {
    /// Creates an empty, never-subscribed record.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            subscription_end: None,
            last_payment_id: None,
            is_active: false,
            last_request_at: None,
        }
    }

    /// Returns true if the pass expires strictly after `now`.
    pub fn has_valid_pass(&self, now: Timestamp) -> bool {
        self.subscription_end
            .map(|end| end.is_after(&now))
            .unwrap_or(false)
    }

    /// Returns true if `payment_id` is the last payment applied here.
    pub fn has_applied(&self, payment_id: &PaymentId) -> bool {
        self.last_payment_id.as_ref() == Some(payment_id)
    }

    /// Derives the lifecycle status at `now`.
    ///
    /// Expiry is never written; it is read off the clock.
    pub fn status_at(&self, now: Timestamp) -> SubscriptionStatus {
        match self.subscription_end {
            None => SubscriptionStatus::Inactive,
            Some(end) if end.is_after(&now) => SubscriptionStatus::Active { expires_at: end },
            Some(end) => SubscriptionStatus::Expired { expired_at: end },
        }
    }
}

/// Lifecycle status of a user's subscription.
///
/// `NoRecord -> Inactive -> Active(T) -> Active(T + 24h) -> ... -> Expired`.
/// Only payment application moves a record forward; `Active -> Expired`
/// happens by the passage of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// No record exists for the user.
    NoRecord,
    /// A record exists but carries no expiry.
    Inactive,
    /// The pass is valid until `expires_at`.
    Active { expires_at: Timestamp },
    /// The pass lapsed at `expired_at`.
    Expired { expired_at: Timestamp },
}

impl SubscriptionStatus {
    /// Derives the status from an optional record.
    pub fn of(record: Option<&UserSubscription>, now: Timestamp) -> Self {
        record
            .map(|r| r.status_at(now))
            .unwrap_or(SubscriptionStatus::NoRecord)
    }

    /// Returns true if the status grants access.
    pub fn has_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn record() -> UserSubscription {
        UserSubscription::empty(UserId::new("user-1").unwrap())
    }

    #[test]
    fn empty_record_is_inactive() {
        let r = record();
        assert_eq!(r.status_at(now()), SubscriptionStatus::Inactive);
        assert!(!r.has_valid_pass(now()));
        assert!(!r.is_active);
    }

    #[test]
    fn future_expiry_is_active() {
        let mut r = record();
        r.subscription_end = Some(now().plus_hours(10));

        assert_eq!(
            r.status_at(now()),
            SubscriptionStatus::Active {
                expires_at: now().plus_hours(10)
            }
        );
        assert!(r.has_valid_pass(now()));
    }

    #[test]
    fn expiry_equal_to_now_is_expired() {
        let mut r = record();
        r.subscription_end = Some(now());

        assert_eq!(
            r.status_at(now()),
            SubscriptionStatus::Expired { expired_at: now() }
        );
        assert!(!r.has_valid_pass(now()));
    }

    #[test]
    fn missing_record_has_no_record_status() {
        assert_eq!(SubscriptionStatus::of(None, now()), SubscriptionStatus::NoRecord);
        assert!(!SubscriptionStatus::NoRecord.has_access());
    }

    #[test]
    fn has_applied_compares_last_payment_id() {
        let mut r = record();
        let pay = PaymentId::new("pay_123").unwrap();
        assert!(!r.has_applied(&pay));

        r.last_payment_id = Some(pay.clone());
        assert!(r.has_applied(&pay));
        assert!(!r.has_applied(&PaymentId::new("pay_456").unwrap()));
    }

    #[test]
    fn record_serializes_with_persisted_field_names() {
        let mut r = record();
        r.subscription_end = Some(now());
        r.last_payment_id = Some(PaymentId::new("pay_1").unwrap());
        r.is_active = true;

        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("subscription_end_timestamp").is_some());
        assert!(json.get("last_request_timestamp").is_some());
        assert_eq!(json["last_payment_id"], "pay_1");
        assert_eq!(json["is_active"], true);
    }
}
