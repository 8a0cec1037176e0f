//! Shared application state for the axum router.

use std::sync::Arc;

use crate::application::handlers::{
    CreateCheckoutHandler, GetAdminStatsHandler, ProcessPaymentWebhookHandler,
    SendChatMessageHandler,
};
use crate::ports::SessionValidator;

/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub session_validator: Arc<dyn SessionValidator>,
    pub chat: Arc<SendChatMessageHandler>,
    pub checkout: Arc<CreateCheckoutHandler>,
    pub admin_stats: Arc<GetAdminStatsHandler>,
    pub webhooks: Arc<ProcessPaymentWebhookHandler>,
}
