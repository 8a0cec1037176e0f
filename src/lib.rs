//! Diskarte - backend for a day-pass chat assistant.
//!
//! Registered users buy 24-hour passes through PayMongo. Paid webhooks are
//! authenticated and applied idempotently to a per-user subscription record,
//! and every chat request goes through a subscription and rate-limit gate
//! before reaching the model.
//!
//! Layout follows a hexagonal split: `domain` holds the pure rules, `ports`
//! the async interfaces, `application` the command/query handlers and
//! `adapters` the HTTP, storage, identity, LLM and payment integrations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
