//! Chat handlers.

mod send_chat_message;

pub use send_chat_message::{
    ChatError, ChatReply, SendChatMessageCommand, SendChatMessageHandler,
};
