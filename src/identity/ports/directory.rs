//! Directory port for user account lookup and registration.

use crate::failure::{Classify, FailureKind};
use crate::identity::domain::{UserAccount, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User account persistence contract.
///
/// The engines consume this read-mostly: invitations resolve usernames and
/// the routing layer resolves the authenticated actor. Registration exists
/// for the out-of-scope authentication layer and for test setup.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Registers a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::DuplicateUsername`] or
    /// [`UserDirectoryError::DuplicateEmail`] when a uniqueness constraint
    /// rejects the account.
    async fn register(&self, account: &UserAccount) -> UserDirectoryResult<()>;

    /// Finds a user account by identifier.
    ///
    /// Returns `None` when the account does not exist.
    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<UserAccount>>;

    /// Finds a user account by unique username.
    ///
    /// Returns `None` when no account holds the username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> UserDirectoryResult<Option<UserAccount>>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// An account with the same username already exists.
    #[error("duplicate username: {0}")]
    DuplicateUsername(Username),

    /// An account with the same email address already exists.
    #[error("duplicate email address: {0}")]
    DuplicateEmail(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for UserDirectoryError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::DuplicateUsername(_) | Self::DuplicateEmail(_) => FailureKind::Conflict,
            Self::Persistence(_) => FailureKind::Internal,
        }
    }
}
