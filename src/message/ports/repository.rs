//! Repository port for the append-only message feed.

use crate::failure::{Classify, FailureKind};
use crate::message::domain::Message;
use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Message persistence contract. The feed is append-only; no update or
/// delete operations exist.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message to its project's feed.
    async fn append(&self, message: &Message) -> MessageRepositoryResult<()>;

    /// Returns the project's messages ordered oldest first.
    async fn messages_for(&self, project: ProjectId)
    -> MessageRepositoryResult<Vec<Message>>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for MessageRepositoryError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Persistence(_) => FailureKind::Internal,
        }
    }
}
