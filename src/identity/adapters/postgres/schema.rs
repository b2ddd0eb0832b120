//! Diesel schema for user account persistence.

diesel::table! {
    /// User accounts with unique usernames and email addresses.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique username.
        #[max_length = 64]
        username -> Varchar,
        /// Unique email address.
        #[max_length = 120]
        email -> Varchar,
        /// Optional profile text.
        about_me -> Nullable<Text>,
        /// Optional skills text.
        skills -> Nullable<Text>,
    }
}
