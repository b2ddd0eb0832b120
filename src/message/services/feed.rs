//! Service layer for posting to and reading a project's message feed.

use crate::failure::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::message::{
    domain::{Message, MessageBody, MessageDomainError},
    ports::{MessageRepository, MessageRepositoryError},
};
use crate::project::domain::ProjectId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for message feed operations.
#[derive(Debug, Error)]
pub enum MessageFeedError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] MessageDomainError),

    /// Message persistence failed.
    #[error(transparent)]
    Repository(#[from] MessageRepositoryError),
}

impl Classify for MessageFeedError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) => FailureKind::Validation,
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for message feed service operations.
pub type MessageFeedResult<T> = Result<T, MessageFeedError>;

/// Message feed orchestration service.
#[derive(Clone)]
pub struct MessageFeedService<M, C>
where
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    messages: Arc<M>,
    clock: Arc<C>,
}

impl<M, C> MessageFeedService<M, C>
where
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new message feed service.
    #[must_use]
    pub const fn new(messages: Arc<M>, clock: Arc<C>) -> Self {
        Self { messages, clock }
    }

    /// Posts a message to the project's feed.
    ///
    /// # Errors
    ///
    /// Returns [`MessageFeedError::Domain`] when the content is empty after
    /// trimming; nothing is appended.
    pub async fn post(
        &self,
        actor: UserId,
        project_id: ProjectId,
        content: &str,
    ) -> MessageFeedResult<Message> {
        let body = MessageBody::new(content)?;
        let message = Message::new(body, actor, project_id, &*self.clock);
        self.messages.append(&message).await?;

        tracing::debug!(project = %project_id, message = %message.id(), "message posted");
        Ok(message)
    }

    /// Returns the project's messages ordered oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`MessageFeedError::Repository`] when persistence lookup
    /// fails.
    pub async fn feed(&self, project_id: ProjectId) -> MessageFeedResult<Vec<Message>> {
        Ok(self.messages.messages_for(project_id).await?)
    }
}
