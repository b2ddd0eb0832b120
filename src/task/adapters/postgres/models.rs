//! Diesel row models for task and subtask persistence.

use super::schema::{subtasks, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Execution status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Optional deadline date.
    pub deadline: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Optional assignee identifier.
    pub assignee_id: Option<uuid::Uuid>,
    /// Hidden flag.
    pub hidden: bool,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Execution status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Optional deadline date.
    pub deadline: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Optional assignee identifier.
    pub assignee_id: Option<uuid::Uuid>,
    /// Hidden flag.
    pub hidden: bool,
}

/// Query result row for subtask records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subtasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubTaskRow {
    /// Subtask identifier.
    pub id: uuid::Uuid,
    /// Subtask title.
    pub title: String,
    /// Deadline date.
    pub deadline: NaiveDate,
    /// Completion flag.
    pub completed: bool,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
}

/// Insert model for subtask records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subtasks)]
pub struct NewSubTaskRow {
    /// Subtask identifier.
    pub id: uuid::Uuid,
    /// Subtask title.
    pub title: String,
    /// Deadline date.
    pub deadline: NaiveDate,
    /// Completion flag.
    pub completed: bool,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
}
