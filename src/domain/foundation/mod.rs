//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, auth types and error types
//! that form the vocabulary of the Diskarte domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AdminAllowList, AuthError, AuthenticatedUser, IdentityClass};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{PaymentId, UserId};
pub use timestamp::Timestamp;
