//! Diesel row models for project persistence.

use super::schema::projects;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Project title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Project description.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Optional skills text.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub skills_required: Option<String>,
    /// Optional deadline date.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Date>)]
    pub deadline: Option<NaiveDate>,
    /// Creator's user identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub creator_id: uuid::Uuid,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: String,
    /// Optional skills text.
    pub skills_required: Option<String>,
    /// Optional deadline date.
    pub deadline: Option<NaiveDate>,
    /// Creator's user identifier.
    pub creator_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
