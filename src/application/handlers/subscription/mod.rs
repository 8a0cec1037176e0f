//! Subscription handlers - the access gate, payment webhooks and admin stats.

mod check_access;
mod get_admin_stats;
mod process_payment_webhook;

pub use check_access::{AccessCheckError, CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
pub use get_admin_stats::{
    AdminStats, AdminStatsError, GetAdminStatsHandler, GetAdminStatsQuery, DEFAULT_PASS_PRICE,
};
pub use process_payment_webhook::{ProcessPaymentWebhookCommand, ProcessPaymentWebhookHandler};
