//! PostgreSQL-backed `ResultRepository` implementation using Diesel ORM.
//!
//! Result rows are loaded together with their uploader identity and academic
//! session via inner joins. The unique index on (course_code, session_id,
//! semester) surfaces as [`ResultStoreError::Duplicate`] on insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::course_result::{
    AcademicSession, CourseCode, CourseResult, CourseResultDraft, CourseTitle, ResultFilter,
    Semester, SessionName,
};
use crate::domain::ports::{ResultRepository, ResultStoreError};
use crate::domain::record::{FileAttachment, ReviewStatus};
use crate::domain::UserId;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_document_repository::row_to_uploader;
use super::models::{AcademicSessionRow, CourseResultRow, NewCourseResultRow, UploaderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{academic_sessions, course_results, users};

/// Diesel-backed implementation of the result repository port.
#[derive(Clone)]
pub struct DieselResultRepository {
    pool: DbPool,
}

impl DieselResultRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type JoinedRow = (CourseResultRow, UploaderRow, AcademicSessionRow);

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ResultStoreError {
    map_basic_pool_error(error, ResultStoreError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ResultStoreError {
    map_basic_diesel_error(error, ResultStoreError::query, ResultStoreError::connection)
}

/// Map insert errors, surfacing unique index violations as duplicates.
fn map_insert_error(error: diesel::result::Error) -> ResultStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            ResultStoreError::duplicate(info.message().to_owned())
        }
        other => map_diesel_error(other),
    }
}

/// Convert a joined database row into a validated domain result.
fn row_to_result(
    row: CourseResultRow,
    uploader: UploaderRow,
    session: AcademicSessionRow,
) -> Result<CourseResult, ResultStoreError> {
    let CourseResultRow {
        id,
        course_code,
        course_title,
        session_id: _,
        semester,
        file_name,
        drive_file_id,
        drive_view_link,
        drive_download_link,
        local_path,
        status,
        uploaded_by: _,
        created_at,
        updated_at,
    } = row;

    let build = || -> Result<CourseResult, String> {
        let course_code = CourseCode::new(course_code).map_err(|err| err.to_string())?;
        let course_title = course_title
            .map(CourseTitle::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        let session_name = SessionName::new(&session.name).map_err(|err| err.to_string())?;
        let semester = Semester::parse(&semester).map_err(|err| err.to_string())?;
        let file = FileAttachment::from_parts(
            file_name,
            drive_file_id,
            drive_view_link,
            drive_download_link,
            local_path,
        )
        .map_err(|err| err.to_string())?;
        let status = ReviewStatus::parse(&status).map_err(|err| err.to_string())?;
        Ok(CourseResult::new(CourseResultDraft {
            id,
            course_code,
            course_title,
            session: AcademicSession::new(session.id, session_name),
            semester,
            file,
            status,
            uploaded_by: row_to_uploader(uploader)?,
            uploaded_at: created_at,
            updated_at,
        }))
    };
    build().map_err(|err| ResultStoreError::query(format!("invalid result row: {err}")))
}

fn rows_to_results(rows: Vec<JoinedRow>) -> Result<Vec<CourseResult>, ResultStoreError> {
    rows.into_iter()
        .map(|(row, uploader, session)| row_to_result(row, uploader, session))
        .collect()
}

#[async_trait]
impl ResultRepository for DieselResultRepository {
    async fn insert(&self, result: &CourseResult) -> Result<(), ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let file = result.file();
        let new_row = NewCourseResultRow {
            id: result.id(),
            course_code: result.course_code().as_str(),
            course_title: result.course_title().map(CourseTitle::as_str),
            session_id: result.session().id(),
            semester: result.semester().as_str(),
            file_name: file.file_name(),
            drive_file_id: file.drive_file_id(),
            drive_view_link: file.drive_view_link(),
            drive_download_link: file.drive_download_link(),
            local_path: file.local_path(),
            status: result.status().as_str(),
            uploaded_by: *result.uploaded_by().id().as_uuid(),
            created_at: result.uploaded_at(),
            updated_at: result.updated_at(),
        };

        diesel::insert_into(course_results::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseResult>, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = course_results::table
            .inner_join(users::table)
            .inner_join(academic_sessions::table)
            .filter(course_results::id.eq(id))
            .select((
                CourseResultRow::as_select(),
                UploaderRow::as_select(),
                AcademicSessionRow::as_select(),
            ))
            .first::<JoinedRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, uploader, session)| row_to_result(row, uploader, session))
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CourseResult>, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = course_results::table
            .inner_join(users::table)
            .inner_join(academic_sessions::table)
            .filter(course_results::id.eq_any(ids))
            .order((course_results::created_at.desc(), course_results::id.asc()))
            .select((
                CourseResultRow::as_select(),
                UploaderRow::as_select(),
                AcademicSessionRow::as_select(),
            ))
            .load::<JoinedRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_results(rows)
    }

    async fn list_all(&self) -> Result<Vec<CourseResult>, ResultStoreError> {
        let criteria = ResultFilter::default();
        self.filter(None, &criteria).await
    }

    async fn list_owned_by(&self, owner: &UserId) -> Result<Vec<CourseResult>, ResultStoreError> {
        let criteria = ResultFilter::default();
        self.filter(Some(owner.clone()), &criteria).await
    }

    async fn filter(
        &self,
        scope: Option<UserId>,
        criteria: &ResultFilter,
    ) -> Result<Vec<CourseResult>, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = course_results::table
            .inner_join(users::table)
            .inner_join(academic_sessions::table)
            .into_boxed();

        if let Some(owner) = &scope {
            query = query.filter(course_results::uploaded_by.eq(*owner.as_uuid()));
        }
        if let Some(fragment) = criteria.course_code() {
            query = query.filter(course_results::course_code.ilike(format!("%{fragment}%")));
        }
        if let Some(fragment) = criteria.session() {
            query = query.filter(academic_sessions::name.ilike(format!("%{fragment}%")));
        }
        if let Some(semester) = criteria.semester() {
            query = query.filter(course_results::semester.eq(semester.as_str()));
        }

        let rows = query
            .order((course_results::created_at.desc(), course_results::id.asc()))
            .select((
                CourseResultRow::as_select(),
                UploaderRow::as_select(),
                AcademicSessionRow::as_select(),
            ))
            .load::<JoinedRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_results(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<CourseResult>, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(course_results::table.filter(course_results::id.eq(id)))
            .set((
                course_results::status.eq(status.as_str()),
                course_results::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        drop(conn);

        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(course_results::table.filter(course_results::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count_all(&self) -> Result<i64, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        course_results::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_owned_by(&self, owner: &UserId) -> Result<i64, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        course_results::table
            .filter(course_results::uploaded_by.eq(owner.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_pending(&self) -> Result<i64, ResultStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        course_results::table
            .filter(course_results::status.eq(ReviewStatus::Pending.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> JoinedRow {
        let uploader_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        (
            CourseResultRow {
                id: Uuid::new_v4(),
                course_code: "CSC101".to_owned(),
                course_title: Some("Intro to Computing".to_owned()),
                session_id,
                semester: "First".to_owned(),
                file_name: "results.pdf".to_owned(),
                drive_file_id: None,
                drive_view_link: None,
                drive_download_link: None,
                local_path: Some("results/results.pdf".to_owned()),
                status: "PENDING".to_owned(),
                uploaded_by: uploader_id,
                created_at: now,
                updated_at: now,
            },
            UploaderRow {
                id: uploader_id,
                display_name: "demo_staff".to_owned(),
                email: "staff@demo.local".to_owned(),
            },
            AcademicSessionRow {
                id: session_id,
                name: "2023/2024".to_owned(),
                created_at: now,
            },
        )
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, ResultStoreError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate() {
        let err = map_insert_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        ));
        assert!(matches!(err, ResultStoreError::Duplicate { .. }));
    }

    #[rstest]
    fn other_database_errors_map_to_query() {
        let err = map_insert_error(diesel::result::Error::NotFound);
        assert!(matches!(err, ResultStoreError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_builds_a_result(valid_row: JoinedRow) {
        let (row, uploader, session) = valid_row;
        let result = row_to_result(row, uploader, session).expect("valid row converts");
        assert_eq!(result.course_code().as_str(), "CSC101");
        assert_eq!(result.semester(), Semester::First);
        assert_eq!(result.session().name().as_str(), "2023/2024");
        assert_eq!(result.status(), ReviewStatus::Pending);
    }

    #[rstest]
    fn row_conversion_rejects_an_unknown_semester(valid_row: JoinedRow) {
        let (mut row, uploader, session) = valid_row;
        row.semester = "Summer".to_owned();
        let error = row_to_result(row, uploader, session).expect_err("unknown semester");
        assert!(matches!(error, ResultStoreError::Query { .. }));
        assert!(error.to_string().contains("invalid result row"));
    }
}
