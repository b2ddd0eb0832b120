//! Diesel schema for message persistence.

diesel::table! {
    /// Append-only per-project messages.
    messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Message content.
        content -> Text,
        /// Send timestamp.
        sent_at -> Timestamptz,
        /// Author's user identifier.
        user_id -> Uuid,
        /// Project identifier.
        project_id -> Uuid,
    }
}
