//! Axum route handlers.
//!
//! Each handler translates the request into a command or query, runs the
//! application handler and maps the result back to HTTP.

mod admin;
mod chat;
mod checkout;
mod health;
mod webhooks;

pub use admin::get_admin_stats;
pub use chat::{send_chat_message, ChatRequest, ChatResponse};
pub use checkout::{create_checkout, CheckoutResponse};
pub use health::{health_check, HealthResponse};
pub use webhooks::{handle_paymongo_webhook, PAYMONGO_SIGNATURE_HEADER};
