//! Driving port for the document approval workflow.
//!
//! HTTP handlers call this port with the session caller's id; the
//! implementation loads the caller, applies the authorization policy, and
//! orchestrates the record store and file store. Handler tests substitute a
//! mock so routing and serialization are covered without persistence.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::record::{FileAttachment, ReviewStatus};
use crate::domain::user::{DisplayName, EmailAddress, UserId, UserSummary};
use crate::domain::{Document, DocumentDraft, DocumentUpload, Error};

/// Outcome of a bulk delete: how many records were removed plus the
/// per-item failures that did not abort the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    pub deleted: usize,
    pub errors: Vec<String>,
}

/// Domain use-case port for document operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentWorkflow: Send + Sync {
    /// List the documents visible to the caller.
    async fn list(&self, actor: &UserId) -> Result<Vec<Document>, Error>;

    /// Create a document record from a validated upload.
    async fn upload(&self, actor: &UserId, upload: DocumentUpload) -> Result<Document, Error>;

    /// Approve a pending document.
    async fn approve(&self, actor: &UserId, document_id: Uuid) -> Result<Document, Error>;

    /// Reject a pending document.
    async fn reject(&self, actor: &UserId, document_id: Uuid) -> Result<Document, Error>;

    /// Delete a document and best-effort clean up its backing file.
    async fn delete(&self, actor: &UserId, document_id: Uuid) -> Result<(), Error>;

    /// Delete a batch of documents, collecting per-item failures.
    async fn delete_many(
        &self,
        actor: &UserId,
        document_ids: &[Uuid],
    ) -> Result<BulkDeleteOutcome, Error>;
}

/// Fixture workflow that behaves like an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentWorkflow;

impl FixtureDocumentWorkflow {
    fn uploader(actor: &UserId) -> Result<UserSummary, Error> {
        let build = || -> Result<UserSummary, String> {
            Ok(UserSummary::new(
                actor.clone(),
                DisplayName::new("demo_staff").map_err(|err| err.to_string())?,
                EmailAddress::new("staff@demo.local").map_err(|err| err.to_string())?,
            ))
        };
        build().map_err(|err| Error::internal(format!("invalid fixture uploader: {err}")))
    }
}

#[async_trait]
impl DocumentWorkflow for FixtureDocumentWorkflow {
    async fn list(&self, _actor: &UserId) -> Result<Vec<Document>, Error> {
        Ok(Vec::new())
    }

    async fn upload(&self, actor: &UserId, upload: DocumentUpload) -> Result<Document, Error> {
        let file_name = upload.file().file_name();
        let file = FileAttachment::local(file_name, format!("documents/{file_name}"))
            .map_err(|err| Error::internal(format!("invalid fixture attachment: {err}")))?;
        Ok(Document::new(DocumentDraft {
            id: Uuid::new_v4(),
            title: upload.title().clone(),
            description: upload.description().to_owned(),
            file,
            status: ReviewStatus::Pending,
            uploaded_by: Self::uploader(actor)?,
            uploaded_at: Utc::now(),
        }))
    }

    async fn approve(&self, _actor: &UserId, _document_id: Uuid) -> Result<Document, Error> {
        Err(Error::not_found("document not found"))
    }

    async fn reject(&self, _actor: &UserId, _document_id: Uuid) -> Result<Document, Error> {
        Err(Error::not_found("document not found"))
    }

    async fn delete(&self, _actor: &UserId, _document_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("document not found"))
    }

    async fn delete_many(
        &self,
        _actor: &UserId,
        document_ids: &[Uuid],
    ) -> Result<BulkDeleteOutcome, Error> {
        if document_ids.is_empty() {
            return Err(Error::invalid_request("no document ids provided"));
        }
        Ok(BulkDeleteOutcome {
            deleted: 0,
            errors: document_ids
                .iter()
                .map(|id| format!("Failed to delete {id}: document not found"))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::record::FileUpload;

    fn sample_upload() -> DocumentUpload {
        let file = FileUpload::try_from_parts("handbook.pdf", vec![1, 2, 3], None)
            .expect("valid file");
        DocumentUpload::try_from_parts("Handbook", "All chapters", None, file)
            .expect("valid upload")
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_upload_creates_a_pending_document() {
        let workflow = FixtureDocumentWorkflow;
        let actor = UserId::random();

        let document = workflow
            .upload(&actor, sample_upload())
            .await
            .expect("fixture upload succeeds");
        assert_eq!(document.status(), ReviewStatus::Pending);
        assert_eq!(document.uploaded_by().id(), &actor);
        assert_eq!(document.file().local_path(), Some("documents/handbook.pdf"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_bulk_delete_rejects_empty_ids() {
        let workflow = FixtureDocumentWorkflow;
        let err = workflow
            .delete_many(&UserId::random(), &[])
            .await
            .expect_err("empty ids rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_bulk_delete_reports_missing_records() {
        let workflow = FixtureDocumentWorkflow;
        let id = Uuid::new_v4();
        let outcome = workflow
            .delete_many(&UserId::random(), &[id])
            .await
            .expect("bulk delete reports outcome");
        assert_eq!(outcome.deleted, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains(&id.to_string()));
    }
}
