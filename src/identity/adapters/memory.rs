//! In-memory user directory over the shared database.

use crate::identity::{
    domain::{UserAccount, UserId, Username},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use crate::storage::MemoryDb;
use async_trait::async_trait;

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone)]
pub struct InMemoryUserDirectory {
    db: MemoryDb,
}

impl InMemoryUserDirectory {
    /// Creates a directory over the shared in-memory database.
    #[must_use]
    pub const fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn register(&self, account: &UserAccount) -> UserDirectoryResult<()> {
        let mut state = self.db.write().map_err(UserDirectoryError::persistence)?;

        if state
            .users
            .iter()
            .any(|row| row.username() == account.username())
        {
            return Err(UserDirectoryError::DuplicateUsername(
                account.username().clone(),
            ));
        }
        if state.users.iter().any(|row| row.email() == account.email()) {
            return Err(UserDirectoryError::DuplicateEmail(
                account.email().as_str().to_owned(),
            ));
        }

        state.users.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<UserAccount>> {
        let state = self.db.read().map_err(UserDirectoryError::persistence)?;
        Ok(state.users.iter().find(|row| row.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> UserDirectoryResult<Option<UserAccount>> {
        let state = self.db.read().map_err(UserDirectoryError::persistence)?;
        Ok(state
            .users
            .iter()
            .find(|row| row.username() == username)
            .cloned())
    }
}
