//! PostgreSQL-backed `DocumentRepository` implementation using Diesel ORM.
//!
//! Document rows are loaded together with their uploader's identity via an
//! inner join and rebuilt through the validated domain constructors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DocumentRepository, DocumentStoreError};
use crate::domain::record::{FileAttachment, ReviewStatus};
use crate::domain::{
    Document, DocumentDraft, DocumentTitle, DisplayName, EmailAddress, UserId, UserSummary,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DocumentRow, NewDocumentRow, UploaderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{documents, users};

/// Diesel-backed implementation of the document repository port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> DocumentStoreError {
    map_basic_pool_error(error, DocumentStoreError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> DocumentStoreError {
    map_basic_diesel_error(
        error,
        DocumentStoreError::query,
        DocumentStoreError::connection,
    )
}

/// Convert an uploader row into a domain identity snapshot.
pub(crate) fn row_to_uploader(row: UploaderRow) -> Result<UserSummary, String> {
    Ok(UserSummary::new(
        UserId::from_uuid(row.id),
        DisplayName::new(&row.display_name).map_err(|err| err.to_string())?,
        EmailAddress::new(&row.email).map_err(|err| err.to_string())?,
    ))
}

/// Convert a joined database row into a validated domain document.
fn row_to_document(
    row: DocumentRow,
    uploader: UploaderRow,
) -> Result<Document, DocumentStoreError> {
    let DocumentRow {
        id,
        title,
        description,
        file_name,
        drive_file_id,
        drive_view_link,
        drive_download_link,
        local_path,
        status,
        uploaded_by: _,
        created_at,
    } = row;

    let build = || -> Result<Document, String> {
        let title = DocumentTitle::new(title).map_err(|err| err.to_string())?;
        let file = FileAttachment::from_parts(
            file_name,
            drive_file_id,
            drive_view_link,
            drive_download_link,
            local_path,
        )
        .map_err(|err| err.to_string())?;
        let status = ReviewStatus::parse(&status).map_err(|err| err.to_string())?;
        Ok(Document::new(DocumentDraft {
            id,
            title,
            description,
            file,
            status,
            uploaded_by: row_to_uploader(uploader)?,
            uploaded_at: created_at,
        }))
    };
    build().map_err(|err| DocumentStoreError::query(format!("invalid document row: {err}")))
}

fn rows_to_documents(
    rows: Vec<(DocumentRow, UploaderRow)>,
) -> Result<Vec<Document>, DocumentStoreError> {
    rows.into_iter()
        .map(|(row, uploader)| row_to_document(row, uploader))
        .collect()
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let file = document.file();
        let new_row = NewDocumentRow {
            id: document.id(),
            title: document.title().as_str(),
            description: document.description(),
            file_name: file.file_name(),
            drive_file_id: file.drive_file_id(),
            drive_view_link: file.drive_view_link(),
            drive_download_link: file.drive_download_link(),
            local_path: file.local_path(),
            status: document.status().as_str(),
            uploaded_by: *document.uploaded_by().id().as_uuid(),
            created_at: document.uploaded_at(),
        };

        diesel::insert_into(documents::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = documents::table
            .inner_join(users::table)
            .filter(documents::id.eq(id))
            .select((DocumentRow::as_select(), UploaderRow::as_select()))
            .first::<(DocumentRow, UploaderRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, uploader)| row_to_document(row, uploader))
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = documents::table
            .inner_join(users::table)
            .filter(documents::id.eq_any(ids))
            .order((documents::created_at.desc(), documents::id.asc()))
            .select((DocumentRow::as_select(), UploaderRow::as_select()))
            .load::<(DocumentRow, UploaderRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_documents(rows)
    }

    async fn list_all(&self) -> Result<Vec<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = documents::table
            .inner_join(users::table)
            .order((documents::created_at.desc(), documents::id.asc()))
            .select((DocumentRow::as_select(), UploaderRow::as_select()))
            .load::<(DocumentRow, UploaderRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_documents(rows)
    }

    async fn list_owned_by(&self, owner: &UserId) -> Result<Vec<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = documents::table
            .inner_join(users::table)
            .filter(documents::uploaded_by.eq(owner.as_uuid()))
            .order((documents::created_at.desc(), documents::id.asc()))
            .select((DocumentRow::as_select(), UploaderRow::as_select()))
            .load::<(DocumentRow, UploaderRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_documents(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(documents::table.filter(documents::id.eq(id)))
            .set(documents::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        drop(conn);

        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(documents::table.filter(documents::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count_all(&self) -> Result<i64, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        documents::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_owned_by(&self, owner: &UserId) -> Result<i64, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        documents::table
            .filter(documents::uploaded_by.eq(owner.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_pending(&self) -> Result<i64, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        documents::table
            .filter(documents::status.eq(ReviewStatus::Pending.as_str()))
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
    fn valid_row() -> (DocumentRow, UploaderRow) {
        let uploader_id = Uuid::new_v4();
        (
            DocumentRow {
                id: Uuid::new_v4(),
                title: "Staff Handbook".to_owned(),
                description: "All chapters".to_owned(),
                file_name: "handbook.pdf".to_owned(),
                drive_file_id: None,
                drive_view_link: None,
                drive_download_link: None,
                local_path: Some("documents/handbook.pdf".to_owned()),
                status: "PENDING".to_owned(),
                uploaded_by: uploader_id,
                created_at: Utc::now(),
            },
            UploaderRow {
                id: uploader_id,
                display_name: "demo_staff".to_owned(),
                email: "staff@demo.local".to_owned(),
            },
        )
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, DocumentStoreError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, DocumentStoreError::Query { .. }));
        assert!(err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_builds_a_document(valid_row: (DocumentRow, UploaderRow)) {
        let (row, uploader) = valid_row;
        let document = row_to_document(row, uploader).expect("valid row converts");
        assert_eq!(document.title().as_str(), "Staff Handbook");
        assert_eq!(document.status(), ReviewStatus::Pending);
        assert_eq!(
            document.file().local_path(),
            Some("documents/handbook.pdf")
        );
        assert_eq!(document.uploaded_by().display_name().as_ref(), "demo_staff");
    }

    #[rstest]
    fn row_conversion_rejects_an_unknown_status(valid_row: (DocumentRow, UploaderRow)) {
        let (mut row, uploader) = valid_row;
        row.status = "SHREDDED".to_owned();
        let error = row_to_document(row, uploader).expect_err("unknown status should fail");
        assert!(matches!(error, DocumentStoreError::Query { .. }));
        assert!(error.to_string().contains("unknown review status"));
    }

    #[rstest]
    fn row_conversion_rejects_conflicting_file_locations(
        valid_row: (DocumentRow, UploaderRow),
    ) {
        let (mut row, uploader) = valid_row;
        row.drive_file_id = Some("drive-id-1".to_owned());
        let error = row_to_document(row, uploader).expect_err("two backends should fail");
        assert!(error.to_string().contains("must not have both"));
    }
}
