//! Diesel row models for user account persistence.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Optional profile text.
    pub about_me: Option<String>,
    /// Optional skills text.
    pub skills: Option<String>,
}

/// Insert model for user accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Optional profile text.
    pub about_me: Option<String>,
    /// Optional skills text.
    pub skills: Option<String>,
}
