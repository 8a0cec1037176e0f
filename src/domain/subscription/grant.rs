//! Day-pass grant rule.
//!
//! A successful payment extends the user's pass by [`GRANT_DURATION_HOURS`].
//! While a pass is still running, the extension stacks on top of the
//! current expiry; otherwise a fresh pass starts at `now`.

use crate::domain::foundation::{PaymentId, Timestamp};
use serde::Serialize;

use super::UserSubscription;

/// Length of one purchased pass.
pub const GRANT_DURATION_HOURS: i64 = 24;

/// Where the new expiry was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantBasis {
    /// Extended from a still-running pass.
    Stacked,
    /// Started from `now`.
    Fresh,
}

/// Fields written when a payment is applied.
///
/// Merged into the stored record; fields not listed here are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassGrant {
    pub payment_id: PaymentId,
    pub new_expiry: Timestamp,
    pub basis: GrantBasis,
}

/// Outcome of deciding what a payment does to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantDecision {
    /// The payment id is already the last one applied; nothing to do.
    AlreadyApplied,
    /// The payment should be applied with this grant.
    Apply(PassGrant),
}

/// Computes the expiry after one more pass.
pub fn extend_expiry(current_end: Option<Timestamp>, now: Timestamp) -> (Timestamp, GrantBasis) {
    match current_end {
        Some(end) if end.is_after(&now) => (end.plus_hours(GRANT_DURATION_HOURS), GrantBasis::Stacked),
        _ => (now.plus_hours(GRANT_DURATION_HOURS), GrantBasis::Fresh),
    }
}

/// Decides how `payment_id` applies to `current` at `now`.
///
/// A missing record is treated as never subscribed.
pub fn decide_grant(
    current: Option<&UserSubscription>,
    payment_id: &PaymentId,
    now: Timestamp,
) -> GrantDecision {
    if current.map(|r| r.has_applied(payment_id)).unwrap_or(false) {
        return GrantDecision::AlreadyApplied;
    }

    let (new_expiry, basis) = extend_expiry(current.and_then(|r| r.subscription_end), now);
    GrantDecision::Apply(PassGrant {
        payment_id: payment_id.clone(),
        new_expiry,
        basis,
    })
}
