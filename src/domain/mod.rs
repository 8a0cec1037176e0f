//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `subscription` - Day-pass record, grant rule and access rule
//! - `payment` - PayMongo webhook signatures, event shape and outcomes
//! - `chat` - Assistant features, prompts and chat log entries

pub mod chat;
pub mod foundation;
pub mod payment;
pub mod subscription;
