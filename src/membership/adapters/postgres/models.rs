//! Diesel row models for membership persistence.

use super::schema::{applications, invitations, project_participants};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for application records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    /// Application identifier.
    pub id: uuid::Uuid,
    /// Applicant's user identifier.
    pub user_id: uuid::Uuid,
    /// Target project identifier.
    pub project_id: uuid::Uuid,
    /// Request status.
    pub status: String,
    /// Submission timestamp.
    pub applied_at: DateTime<Utc>,
}

/// Insert model for application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplicationRow {
    /// Application identifier.
    pub id: uuid::Uuid,
    /// Applicant's user identifier.
    pub user_id: uuid::Uuid,
    /// Target project identifier.
    pub project_id: uuid::Uuid,
    /// Request status.
    pub status: String,
    /// Submission timestamp.
    pub applied_at: DateTime<Utc>,
}

/// Query result row for invitation records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvitationRow {
    /// Invitation identifier.
    pub id: uuid::Uuid,
    /// Invitee's user identifier.
    pub user_id: uuid::Uuid,
    /// Target project identifier.
    pub project_id: uuid::Uuid,
    /// Offer status.
    pub status: String,
    /// Creation timestamp.
    pub invited_at: DateTime<Utc>,
}

/// Insert model for invitation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub struct NewInvitationRow {
    /// Invitation identifier.
    pub id: uuid::Uuid,
    /// Invitee's user identifier.
    pub user_id: uuid::Uuid,
    /// Target project identifier.
    pub project_id: uuid::Uuid,
    /// Offer status.
    pub status: String,
    /// Creation timestamp.
    pub invited_at: DateTime<Utc>,
}

/// Query result row for participant records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParticipantRow {
    /// Participant identifier.
    pub id: uuid::Uuid,
    /// Member's user identifier.
    pub user_id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Insert model for participant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_participants)]
pub struct NewParticipantRow {
    /// Participant identifier.
    pub id: uuid::Uuid,
    /// Member's user identifier.
    pub user_id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}
