//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (webhook processing, chat, checkout) are kept separate
//! from query handlers (access checks, admin stats).

pub mod handlers;

pub use handlers::*;
