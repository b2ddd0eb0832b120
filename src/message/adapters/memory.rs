//! In-memory message repository over the shared database.

use crate::message::{
    domain::Message,
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};
use crate::project::domain::ProjectId;
use crate::storage::MemoryDb;
use async_trait::async_trait;

/// Thread-safe in-memory message repository.
#[derive(Debug, Clone)]
pub struct InMemoryMessageRepository {
    db: MemoryDb,
}

impl InMemoryMessageRepository {
    /// Creates a repository over the shared in-memory database.
    #[must_use]
    pub const fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &Message) -> MessageRepositoryResult<()> {
        let mut state = self.db.write().map_err(MessageRepositoryError::persistence)?;
        state.messages.push(message.clone());
        Ok(())
    }

    async fn messages_for(
        &self,
        project: ProjectId,
    ) -> MessageRepositoryResult<Vec<Message>> {
        let state = self.db.read().map_err(MessageRepositoryError::persistence)?;
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|row| row.project_id() == project)
            .cloned()
            .collect();
        messages.sort_by_key(Message::sent_at);
        Ok(messages)
    }
}
