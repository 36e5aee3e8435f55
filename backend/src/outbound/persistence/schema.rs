//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Community members.
    ///
    /// `email` is unique (`members_email_key`); `phone` is unique when not
    /// null (`members_phone_key`).
    members (id) {
        id -> Int8,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 20]
        phone -> Nullable<Varchar>,
    }
}
