//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriptionStore` / `SubscriptionReader` - per-user day-pass records
//! - `ChatLogRepository` - chat history
//! - `SessionValidator` - identity tokens
//! - `AIProvider` - text generation
//! - `PaymentProvider` - hosted checkout

mod ai_provider;
mod chat_log_repository;
mod payment_provider;
mod session_validator;
mod subscription_store;

pub use ai_provider::{AIError, AIProvider, ProviderInfo};
pub use chat_log_repository::ChatLogRepository;
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use session_validator::SessionValidator;
pub use subscription_store::{
    GrantSnapshot, SubscriptionReader, SubscriptionStatistics, SubscriptionStore, WriteResult,
};
