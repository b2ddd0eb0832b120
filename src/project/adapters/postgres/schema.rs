//! Diesel schema for project persistence.

diesel::table! {
    /// Projects with their immutable creator reference.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project title.
        #[max_length = 100]
        title -> Varchar,
        /// Project description.
        description -> Text,
        /// Optional skills text.
        skills_required -> Nullable<Text>,
        /// Optional deadline date.
        deadline -> Nullable<Date>,
        /// Creator's user identifier.
        creator_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
