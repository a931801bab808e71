//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, update this file by hand or regenerate it
//! with `diesel print-schema`.

diesel::table! {
    /// Branches (university chapters).
    branches (id) {
        id -> Int4,
        name -> Varchar,
        university -> Nullable<Varchar>,
        province -> Nullable<Varchar>,
        /// Maintained externally; never recomputed transactionally.
        member_count -> Int4,
        alumni_count -> Int4,
    }
}

diesel::table! {
    /// Member accounts.
    ///
    /// `role` and `status` are unconstrained text; parsing happens in the
    /// adapter so unknown values surface as access denials.
    users (id) {
        id -> Int4,
        name -> Varchar,
        /// Unique (`users_email_key`).
        email -> Varchar,
        /// bcrypt hash; never selected outside the login lookup.
        password_hash -> Text,
        role -> Varchar,
        status -> Varchar,
        branch_id -> Nullable<Int4>,
        is_bec_member -> Bool,
        nec_position -> Nullable<Varchar>,
        bec_position -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Int4,
        title -> Varchar,
        date -> Timestamptz,
        branch_id -> Int4,
        created_by -> Int4,
        event_type -> Varchar,
    }
}

diesel::table! {
    news (id) {
        id -> Int4,
        title -> Varchar,
        content -> Text,
        branch_id -> Int4,
        author_id -> Int4,
        publish_date -> Timestamptz,
    }
}

diesel::table! {
    alumni (id) {
        id -> Int4,
        user_id -> Int4,
        branch_id -> Int4,
        graduation_date -> Date,
        degree -> Varchar,
        current_status -> Varchar,
    }
}

diesel::table! {
    /// Dashboard counts captured as trend baselines.
    stats_snapshots (id) {
        id -> Int4,
        captured_at -> Timestamptz,
        total_users -> Int8,
        total_events -> Int8,
        total_branches -> Int8,
        total_alumni -> Int8,
        total_news -> Int8,
        active_users -> Int8,
        upcoming_events -> Int8,
    }
}

diesel::joinable!(users -> branches (branch_id));
diesel::joinable!(events -> branches (branch_id));
diesel::joinable!(events -> users (created_by));
diesel::joinable!(news -> branches (branch_id));
diesel::joinable!(news -> users (author_id));
diesel::joinable!(alumni -> branches (branch_id));
diesel::joinable!(alumni -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    alumni,
    branches,
    events,
    news,
    stats_snapshots,
    users,
);
