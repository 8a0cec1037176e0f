//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum routes
//! - `postgres` - sqlx persistence
//! - `memory` - in-process persistence for development and tests
//! - `auth` - identity token validation
//! - `ai` - LLM providers
//! - `paymongo` - checkout sessions

pub mod ai;
pub mod auth;
pub mod http;
pub mod memory;
pub mod paymongo;
pub mod postgres;
