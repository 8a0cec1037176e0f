//! Mock session validator for testing.
//!
//! Maps fixed tokens to users so handlers and routes can be exercised
//! without a live identity provider.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_registered_user("token-1", "uid-1")
//!     .with_anonymous_user("trial-token", "anon-1");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Tokens not registered return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a token for a registered (paying) user.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is blank.
    pub fn with_registered_user(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = AuthenticatedUser::registered(
            UserId::new(user_id).expect("test user id must not be blank"),
            Some(format!("{}@test.example.com", user_id)),
        );
        self.with_user(token, user)
    }

    /// Adds a token for an anonymous trial user.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is blank.
    pub fn with_anonymous_user(self, token: impl Into<String>, user_id: &str) -> Self {
        let user =
            AuthenticatedUser::anonymous(UserId::new(user_id).expect("test user id must not be blank"));
        self.with_user(token, user)
    }

    /// Forces all validations to return `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::IdentityClass;

    #[tokio::test]
    async fn registered_token_validates() {
        let validator = MockSessionValidator::new().with_registered_user("t1", "uid-1");

        let user = validator.validate("t1").await.unwrap();
        assert_eq!(user.id.as_str(), "uid-1");
        assert_eq!(user.identity_class, IdentityClass::Registered);
    }

    #[tokio::test]
    async fn anonymous_token_validates_as_anonymous() {
        let validator = MockSessionValidator::new().with_anonymous_user("trial", "anon-1");
        assert!(validator.validate("trial").await.unwrap().is_anonymous());
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new();
        assert!(matches!(
            validator.validate("nope").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn forced_error_overrides_tokens() {
        let validator = MockSessionValidator::new()
            .with_registered_user("t1", "uid-1")
            .with_error(AuthError::service_unavailable("down"));

        assert!(validator.validate("t1").await.unwrap_err().is_transient());
    }
}
