//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Departments that staff accounts belong to.
    departments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique department name.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Academic periods results are filed under, created on first use.
    academic_sessions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique session name, e.g. `2023/2024` (max 20 characters).
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User accounts with their role, approval flag, and password hash.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Unique login email address.
        email -> Varchar,
        /// Argon2 PHC string for the account password.
        password_hash -> Varchar,
        /// Role discriminator: `HOD` or `STAFF`.
        role -> Varchar,
        /// Department the account belongs to, when assigned.
        department_id -> Nullable<Uuid>,
        /// Whether the account may authenticate.
        approved -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Document records held for departmental review.
    documents (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Document title (max 200 characters).
        title -> Varchar,
        /// Free-form description; may carry a `Category:` prefix line.
        description -> Text,
        /// Original file name supplied by the uploader.
        file_name -> Varchar,
        /// Drive file identifier, when the file was relocated to Drive.
        drive_file_id -> Nullable<Varchar>,
        /// Browser view link issued by Drive.
        drive_view_link -> Nullable<Varchar>,
        /// Direct download link issued by Drive.
        drive_download_link -> Nullable<Varchar>,
        /// Path relative to the upload directory, when stored locally.
        local_path -> Nullable<Varchar>,
        /// Review status: `PENDING`, `APPROVED`, or `REJECTED`.
        status -> Varchar,
        /// Uploader account id.
        uploaded_by -> Uuid,
        /// Upload timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Course result records; (course_code, session_id, semester) is unique.
    course_results (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Course code, e.g. `CSC101` (max 20 characters).
        course_code -> Varchar,
        /// Optional human-readable course title.
        course_title -> Nullable<Varchar>,
        /// Academic session the result was filed under.
        session_id -> Uuid,
        /// Semester discriminator: `First` or `Second`.
        semester -> Varchar,
        /// Original file name supplied by the uploader.
        file_name -> Varchar,
        /// Drive file identifier, when the file was relocated to Drive.
        drive_file_id -> Nullable<Varchar>,
        /// Browser view link issued by Drive.
        drive_view_link -> Nullable<Varchar>,
        /// Direct download link issued by Drive.
        drive_download_link -> Nullable<Varchar>,
        /// Path relative to the upload directory, when stored locally.
        local_path -> Nullable<Varchar>,
        /// Review status: `PENDING`, `APPROVED`, or `REJECTED`.
        status -> Varchar,
        /// Uploader account id.
        uploaded_by -> Uuid,
        /// Upload timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, refreshed by review decisions.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> departments (department_id));
diesel::joinable!(documents -> users (uploaded_by));
diesel::joinable!(course_results -> users (uploaded_by));
diesel::joinable!(course_results -> academic_sessions (session_id));

diesel::allow_tables_to_appear_in_same_query!(
    academic_sessions,
    course_results,
    departments,
    documents,
    users,
);
