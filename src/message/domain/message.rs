//! Message entity: one immutable entry in a project's feed.

use super::{MessageDomainError, MessageId};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, trimmed message content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    /// Creates validated message content.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::EmptyContent`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, MessageDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(MessageDomainError::EmptyContent);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the content as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in a project's message feed. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    content: MessageBody,
    sent_at: DateTime<Utc>,
    user_id: UserId,
    project_id: ProjectId,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Persisted content.
    pub content: MessageBody,
    /// Persisted send timestamp.
    pub sent_at: DateTime<Utc>,
    /// Persisted author identifier.
    pub user_id: UserId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
}

impl Message {
    /// Creates a new message stamped with the current clock time.
    #[must_use]
    pub fn new(
        content: MessageBody,
        user_id: UserId,
        project_id: ProjectId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            content,
            sent_at: clock.utc(),
            user_id,
            project_id,
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            content: data.content,
            sent_at: data.sent_at,
            user_id: data.user_id,
            project_id: data.project_id,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the message content.
    #[must_use]
    pub const fn content(&self) -> &MessageBody {
        &self.content
    }

    /// Returns the send timestamp.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Returns the author's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}
