//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `username` is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer tokens, keyed by SHA-256 fingerprint.
    auth_tokens (fingerprint) {
        fingerprint -> Text,
        user_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Gazetteer entries. `id` order is insertion order.
    locations (id) {
        id -> Int4,
        name -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
    }
}

diesel::table! {
    /// Posts tagged with the name of their resolved location.
    posts (id) {
        id -> Int8,
        user_id -> Uuid,
        location_name -> Varchar,
        content -> Text,
        likes -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(posts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(auth_tokens, locations, posts, users);
