//! Participant record: active membership in a project.

use super::ParticipantId;
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Active membership of one user in one project.
///
/// At most one participant record may exist per (user, project) pair; the
/// storage layer enforces this with a uniqueness constraint rather than a
/// read-then-insert check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    user_id: UserId,
    project_id: ProjectId,
    joined_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedParticipantData {
    /// Persisted participant identifier.
    pub id: ParticipantId,
    /// Persisted member identifier.
    pub user_id: UserId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
    /// Persisted join timestamp.
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Creates a new participant record joining now.
    #[must_use]
    pub fn new(user_id: UserId, project_id: ProjectId, clock: &impl Clock) -> Self {
        Self {
            id: ParticipantId::new(),
            user_id,
            project_id,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a participant from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedParticipantData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            project_id: data.project_id,
            joined_at: data.joined_at,
        }
    }

    /// Returns the participant identifier.
    #[must_use]
    pub const fn id(&self) -> ParticipantId {
        self.id
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the join timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}
