//! SendChatMessageHandler - gated chat with the assistant.
//!
//! Flow: subscription gate (registered callers only) → message validation →
//! API key check → either the `LIST_MODELS` debug command or one model call
//! → chat log append.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::handlers::subscription::{
    CheckAccessHandler, CheckAccessQuery, CheckAccessResult,
};
use crate::domain::chat::{compose_prompt, ChatLogEntry, FeatureType, UserMessage, EMPTY_REPLY};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::subscription::AccessDeniedReason;
use crate::ports::{AIError, AIProvider, ChatLogRepository};

#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub user: AuthenticatedUser,
    /// Raw `message` from the request body.
    pub message: Option<String>,
    /// Raw `featureType` from the request body.
    pub feature_type: Option<String>,
}

/// Text returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
}

#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("access denied: {0}")]
    AccessDenied(AccessDeniedReason),

    #[error("access check failed: {0}")]
    AccessCheckFailed(String),

    #[error("The function must be called with a message.")]
    MissingMessage,

    #[error("API Key not configured.")]
    NotConfigured,

    #[error("upstream error: {0}")]
    Upstream(AIError),
}

pub struct SendChatMessageHandler {
    gate: Arc<CheckAccessHandler>,
    ai: Arc<dyn AIProvider>,
    chat_log: Arc<dyn ChatLogRepository>,
    clock: fn() -> Timestamp,
}

impl SendChatMessageHandler {
    pub fn new(
        gate: Arc<CheckAccessHandler>,
        ai: Arc<dyn AIProvider>,
        chat_log: Arc<dyn ChatLogRepository>,
    ) -> Self {
        Self {
            gate,
            ai,
            chat_log,
            clock: Timestamp::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(&self, cmd: SendChatMessageCommand) -> Result<ChatReply, ChatError> {
        let access = self
            .gate
            .handle(CheckAccessQuery {
                user_id: cmd.user.id.clone(),
                identity_class: cmd.user.identity_class,
            })
            .await
            .map_err(|e| {
                error!(user_id = %cmd.user.id, error = %e, "Subscription check failed");
                ChatError::AccessCheckFailed(e.to_string())
            })?;
        if let CheckAccessResult::Denied(reason) = access {
            return Err(ChatError::AccessDenied(reason));
        }

        let message = cmd
            .message
            .as_deref()
            .map(UserMessage::new)
            .and_then(Result::ok)
            .ok_or(ChatError::MissingMessage)?;

        if !self.ai.is_configured() {
            error!("AI provider API key missing");
            return Err(ChatError::NotConfigured);
        }

        if message.is_list_models_command() {
            return Ok(self.list_models().await);
        }

        let feature = FeatureType::from_key(cmd.feature_type.as_deref());
        let prompt = compose_prompt(&feature, &message);
        let info = self.ai.provider_info();

        let answer = self.ai.generate(&prompt).await.map_err(|e| {
            error!(provider = %info.name, model = %info.model, error = %e, "AI provider call failed");
            ChatError::Upstream(e)
        })?;

        let Some(text) = answer else {
            warn!(user_id = %cmd.user.id, "Model returned no candidate");
            return Ok(ChatReply {
                text: EMPTY_REPLY.to_string(),
            });
        };

        let entry = ChatLogEntry::ai_reply(text.clone(), (self.clock)());
        if let Err(e) = self.chat_log.append(&cmd.user.id, &feature, &entry).await {
            warn!(user_id = %cmd.user.id, feature = feature.key(), error = %e, "Failed to store chat log entry");
        }

        info!(user_id = %cmd.user.id, feature = feature.key(), "Chat reply generated");
        Ok(ChatReply { text })
    }

    async fn list_models(&self) -> ChatReply {
        match self.ai.list_models().await {
            Ok(models) => ChatReply {
                text: format!("Available Models: {}", models.join(", ")),
            },
            Err(e) => {
                error!(error = %e, "List models failed");
                ChatReply {
                    text: format!("Error Listing Models: {}", e.detail()),
                }
            }
        }
    }
}
