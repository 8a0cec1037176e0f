//! Router assembly.
//!
//! # Routes
//!
//! ## User endpoints (Bearer token)
//! - `POST /chat` - gated chat with the assistant
//! - `POST /checkout` - start a day-pass purchase
//! - `GET /admin/stats` - dashboard counts, admins only
//!
//! ## Provider endpoints (signature verified)
//! - `POST /webhooks/paymongo`
//!
//! - `GET /health`

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{
    create_checkout, get_admin_stats, handle_paymongo_webhook, health_check, send_chat_message,
};
use super::middleware::auth_middleware;
use super::state::AppState;

/// Router-level settings taken from server configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub fn create_router(state: AppState, config: &RouterConfig) -> Router {
    let user_routes = Router::new()
        .route("/chat", post(send_chat_message))
        .route("/checkout", post(create_checkout))
        .route("/admin/stats", get(get_admin_stats))
        .route_layer(from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/webhooks/paymongo", post(handle_paymongo_webhook))
        .merge(user_routes)
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if allowed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
