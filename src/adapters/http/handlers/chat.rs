use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ChatApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::SendChatMessageCommand;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub feature_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
}

/// `POST /chat`
///
/// A missing or unreadable body is treated as a missing message, which is
/// only reported after the subscription gate has run.
pub async fn send_chat_message(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Option<Json<ChatRequest>>,
) -> Result<Json<ChatResponse>, ChatApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let reply = state
        .chat
        .handle(SendChatMessageCommand {
            user,
            message: body.message,
            feature_type: body.feature_type,
        })
        .await
        .map_err(ChatApiError)?;

    Ok(Json(ChatResponse { text: reply.text }))
}
