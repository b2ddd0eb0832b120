//! Diesel schema for membership persistence.
//!
//! `project_participants` carries a unique index on (`project_id`,
//! `user_id`) named `idx_participants_project_user_unique`; it is the
//! storage-level guarantee that a user joins a project at most once.

diesel::table! {
    /// Applicant-initiated membership requests.
    applications (id) {
        /// Application identifier.
        id -> Uuid,
        /// Applicant's user identifier.
        user_id -> Uuid,
        /// Target project identifier.
        project_id -> Uuid,
        /// Request status.
        #[max_length = 20]
        status -> Varchar,
        /// Submission timestamp.
        applied_at -> Timestamptz,
    }
}

diesel::table! {
    /// Creator-initiated membership offers.
    invitations (id) {
        /// Invitation identifier.
        id -> Uuid,
        /// Invitee's user identifier.
        user_id -> Uuid,
        /// Target project identifier.
        project_id -> Uuid,
        /// Offer status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        invited_at -> Timestamptz,
    }
}

diesel::table! {
    /// Active project memberships.
    project_participants (id) {
        /// Participant identifier.
        id -> Uuid,
        /// Member's user identifier.
        user_id -> Uuid,
        /// Project identifier.
        project_id -> Uuid,
        /// Join timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(applications, invitations, project_participants);
