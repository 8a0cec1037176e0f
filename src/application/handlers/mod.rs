//! Command and query handlers.

pub mod chat;
pub mod checkout;
pub mod subscription;

pub use chat::{ChatError, ChatReply, SendChatMessageCommand, SendChatMessageHandler};
pub use checkout::{CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult};
pub use subscription::{
    AccessCheckError, AdminStats, AdminStatsError, CheckAccessHandler, CheckAccessQuery,
    CheckAccessResult, GetAdminStatsHandler, GetAdminStatsQuery, ProcessPaymentWebhookCommand,
    ProcessPaymentWebhookHandler, DEFAULT_PASS_PRICE,
};
