//! Diesel schema for task and subtask persistence.

diesel::table! {
    /// Tasks with execution status and assignment.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 100]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Execution status.
        #[max_length = 20]
        status -> Varchar,
        /// Completion flag, kept consistent with `status`.
        completed -> Bool,
        /// Optional deadline date.
        deadline -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Optional assignee identifier.
        assignee_id -> Nullable<Uuid>,
        /// Hidden flag for the execution view.
        hidden -> Bool,
    }
}

diesel::table! {
    /// Subtasks owned by a task.
    subtasks (id) {
        /// Subtask identifier.
        id -> Uuid,
        /// Subtask title.
        #[max_length = 128]
        title -> Varchar,
        /// Deadline date.
        deadline -> Date,
        /// Completion flag.
        completed -> Bool,
        /// Owning task identifier.
        task_id -> Uuid,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, subtasks);
