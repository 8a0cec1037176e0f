//! In-memory adapters for development and tests.

mod chat_log;
mod subscription_store;

pub use chat_log::InMemoryChatLogRepository;
pub use subscription_store::InMemorySubscriptionStore;
