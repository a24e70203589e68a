//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{academic_sessions, course_results, departments, documents, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    #[expect(dead_code, reason = "resolved via the departments join")]
    pub department_id: Option<Uuid>,
    pub approved: bool,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub department_id: Option<Uuid>,
    pub approved: bool,
}

/// Insertable struct for creating department records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
pub(crate) struct NewDepartmentRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the academic_sessions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = academic_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AcademicSessionRow {
    pub id: Uuid,
    pub name: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating academic session records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = academic_sessions)]
pub(crate) struct NewAcademicSessionRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub drive_file_id: Option<String>,
    pub drive_view_link: Option<String>,
    pub drive_download_link: Option<String>,
    pub local_path: Option<String>,
    pub status: String,
    #[expect(dead_code, reason = "resolved via the users join")]
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new document records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub file_name: &'a str,
    pub drive_file_id: Option<&'a str>,
    pub drive_view_link: Option<&'a str>,
    pub drive_download_link: Option<&'a str>,
    pub local_path: Option<&'a str>,
    pub status: &'a str,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the course_results table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = course_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseResultRow {
    pub id: Uuid,
    pub course_code: String,
    pub course_title: Option<String>,
    #[expect(dead_code, reason = "resolved via the academic_sessions join")]
    pub session_id: Uuid,
    pub semester: String,
    pub file_name: String,
    pub drive_file_id: Option<String>,
    pub drive_view_link: Option<String>,
    pub drive_download_link: Option<String>,
    pub local_path: Option<String>,
    pub status: String,
    #[expect(dead_code, reason = "resolved via the users join")]
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new course result records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = course_results)]
pub(crate) struct NewCourseResultRow<'a> {
    pub id: Uuid,
    pub course_code: &'a str,
    pub course_title: Option<&'a str>,
    pub session_id: Uuid,
    pub semester: &'a str,
    pub file_name: &'a str,
    pub drive_file_id: Option<&'a str>,
    pub drive_view_link: Option<&'a str>,
    pub drive_download_link: Option<&'a str>,
    pub local_path: Option<&'a str>,
    pub status: &'a str,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Uploader identity columns selected alongside record rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UploaderRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
}
