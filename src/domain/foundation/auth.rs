//! Authentication types for the domain layer.
//!
//! These types represent a caller whose identity token has been verified by
//! the external identity provider. They carry no provider dependencies; any
//! `SessionValidator` adapter can populate them.

use super::UserId;
use std::collections::HashSet;
use thiserror::Error;

/// Class of identity the caller signed in with.
///
/// The subscription gate is only total over `Registered` callers. Anonymous
/// (trial) identities are governed by a separate client-side allowance and
/// bypass the gate entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityClass {
    /// Signed in anonymously; treated as a trial user.
    Anonymous,
    /// Signed in with a real credential (email, Google, phone, ...).
    Registered,
}

impl IdentityClass {
    /// Derives the identity class from the provider's sign-in method claim.
    pub fn from_sign_in_provider(provider: Option<&str>) -> Self {
        match provider {
            Some("anonymous") => IdentityClass::Anonymous,
            _ => IdentityClass::Registered,
        }
    }

    /// Returns true if the caller is exempt from subscription checks.
    pub fn bypasses_subscription_gate(&self) -> bool {
        matches!(self, IdentityClass::Anonymous)
    }
}

/// Authenticated caller extracted from a validated identity token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// How the user signed in.
    pub identity_class: IdentityClass,

    /// Email address, when the sign-in method carries one.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a registered (non-trial) user.
    pub fn registered(id: UserId, email: Option<String>) -> Self {
        Self {
            id,
            identity_class: IdentityClass::Registered,
            email,
        }
    }

    /// Creates an anonymous trial user.
    pub fn anonymous(id: UserId) -> Self {
        Self {
            id,
            identity_class: IdentityClass::Anonymous,
            email: None,
        }
    }

    /// Returns true if the user signed in anonymously.
    pub fn is_anonymous(&self) -> bool {
        self.identity_class == IdentityClass::Anonymous
    }
}

/// Identities allowed to use privileged endpoints.
///
/// Membership is an exact match on the user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    ids: HashSet<String>,
}

impl AdminAllowList {
    /// Builds the list, skipping blank entries.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(|id| id.as_ref().trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.ids.contains(user_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// User exists but lacks required permissions for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
