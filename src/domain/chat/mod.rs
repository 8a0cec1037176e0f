//! Chat module - assistant features, prompts and chat log entries.

mod feature;
mod message;

pub use feature::FeatureType;
pub use message::{
    compose_prompt, ChatLogEntry, Sender, UserMessage, EMPTY_REPLY, LIST_MODELS_COMMAND,
};
