//! Diesel row models for message persistence.

use super::schema::messages;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for message records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Message content.
    pub content: String,
    /// Send timestamp.
    pub sent_at: DateTime<Utc>,
    /// Author's user identifier.
    pub user_id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
}

/// Insert model for message records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Message content.
    pub content: String,
    /// Send timestamp.
    pub sent_at: DateTime<Utc>,
    /// Author's user identifier.
    pub user_id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
}
