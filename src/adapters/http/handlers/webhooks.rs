use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::WebhookApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::ProcessPaymentWebhookCommand;

pub const PAYMONGO_SIGNATURE_HEADER: &str = "Paymongo-Signature";

/// `POST /webhooks/paymongo`
///
/// The body is taken as raw bytes; the signature covers them exactly, so
/// nothing may parse or re-encode it before verification.
pub async fn handle_paymongo_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(PAYMONGO_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match state
        .webhooks
        .handle(ProcessPaymentWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await
    {
        Ok(outcome) => (StatusCode::OK, outcome.response_body()).into_response(),
        Err(e) => WebhookApiError(e).into_response(),
    }
}
