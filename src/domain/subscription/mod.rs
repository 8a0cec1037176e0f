//! Subscription module - the per-user day-pass record and its rules.
//!
//! Two writers touch a record: payment application (grant fields) and the
//! access gate (`last_request_at` only). Both decide in pure functions here
//! and persist through conditional writes in the store.

mod access;
mod grant;
mod record;

pub use access::{evaluate_access, AccessDecision, AccessDeniedReason, RATE_LIMIT_INTERVAL_SECS};
pub use grant::{decide_grant, extend_expiry, GrantBasis, GrantDecision, PassGrant, GRANT_DURATION_HOURS};
pub use record::{SubscriptionStatus, UserSubscription};
