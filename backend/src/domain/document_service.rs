//! Document workflow domain service.
//!
//! Implements the document driving port on top of the persistence and file
//! store ports: role-scoped listing, uploads with stored backing files,
//! review decisions, and single or bulk deletion with best-effort cleanup.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::actor::resolve_actor;
use crate::domain::document::{Document, DocumentDraft, DocumentUpload};
use crate::domain::policy;
use crate::domain::ports::{
    BulkDeleteOutcome, DocumentRepository, DocumentStoreError, DocumentWorkflow, FileCategory,
    FileStore, FileStoreError, UserRepository,
};
use crate::domain::record::{FileAttachment, ReviewStatus, ReviewTransition};
use crate::domain::user::UserId;

fn map_store_error(error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Connection { message } => {
            Error::service_unavailable(format!("document store unavailable: {message}"))
        }
        DocumentStoreError::Query { message } => {
            Error::internal(format!("document store error: {message}"))
        }
    }
}

fn map_file_error(error: FileStoreError) -> Error {
    match error {
        FileStoreError::Transport { message } => {
            Error::service_unavailable(format!("file store unavailable: {message}"))
        }
        FileStoreError::Rejected { message } | FileStoreError::Io { message } => {
            Error::internal(format!("file store error: {message}"))
        }
    }
}

/// Domain service implementing the document workflow port.
#[derive(Clone)]
pub struct DocumentWorkflowService<R, U, F> {
    documents: Arc<R>,
    users: Arc<U>,
    files: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<R, U, F> DocumentWorkflowService<R, U, F> {
    /// Create a new workflow service over the given ports.
    pub fn new(documents: Arc<R>, users: Arc<U>, files: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            documents,
            users,
            files,
            clock,
        }
    }
}

impl<R, U, F> DocumentWorkflowService<R, U, F>
where
    R: DocumentRepository,
    U: UserRepository,
    F: FileStore,
{
    async fn review(
        &self,
        actor: &UserId,
        document_id: Uuid,
        decision: ReviewStatus,
    ) -> Result<Document, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let existing = self
            .documents
            .find_by_id(document_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("document not found"))?;
        if !policy::can_approve(&actor) {
            return Err(Error::forbidden("permission denied"));
        }

        match existing.status().review_transition(decision) {
            ReviewTransition::NoOp => Ok(existing),
            ReviewTransition::Conflict => Err(Error::conflict(format!(
                "document already {}",
                existing.status().as_str().to_lowercase()
            ))),
            ReviewTransition::Apply => self
                .documents
                .set_status(document_id, decision)
                .await
                .map_err(map_store_error)?
                .ok_or_else(|| Error::not_found("document not found")),
        }
    }

    /// Remove the backing file, logging failures instead of surfacing them.
    async fn discard_file(&self, document_id: Uuid, attachment: &FileAttachment) -> Option<String> {
        match self.files.remove(attachment).await {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(
                    document_id = %document_id,
                    error = %error,
                    "document file cleanup failed"
                );
                Some(error.to_string())
            }
        }
    }
}

#[async_trait]
impl<R, U, F> DocumentWorkflow for DocumentWorkflowService<R, U, F>
where
    R: DocumentRepository,
    U: UserRepository,
    F: FileStore,
{
    async fn list(&self, actor: &UserId) -> Result<Vec<Document>, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let documents = if policy::can_list_all(&actor) {
            self.documents.list_all().await
        } else {
            self.documents.list_owned_by(actor.id()).await
        };
        documents.map_err(map_store_error)
    }

    async fn upload(&self, actor: &UserId, upload: DocumentUpload) -> Result<Document, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        if !policy::can_create(&actor) {
            return Err(Error::forbidden("user account is disabled"));
        }

        let file = self
            .files
            .store(upload.file(), FileCategory::Documents)
            .await
            .map_err(map_file_error)?;
        let document = Document::new(DocumentDraft {
            id: Uuid::new_v4(),
            title: upload.title().clone(),
            description: upload.description().to_owned(),
            file,
            status: ReviewStatus::Pending,
            uploaded_by: actor.summary(),
            uploaded_at: self.clock.utc(),
        });

        if let Err(error) = self.documents.insert(&document).await {
            // The stored file would otherwise be orphaned.
            self.discard_file(document.id(), document.file()).await;
            return Err(map_store_error(error));
        }
        Ok(document)
    }

    async fn approve(&self, actor: &UserId, document_id: Uuid) -> Result<Document, Error> {
        self.review(actor, document_id, ReviewStatus::Approved).await
    }

    async fn reject(&self, actor: &UserId, document_id: Uuid) -> Result<Document, Error> {
        self.review(actor, document_id, ReviewStatus::Rejected).await
    }

    async fn delete(&self, actor: &UserId, document_id: Uuid) -> Result<(), Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let existing = self
            .documents
            .find_by_id(document_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("document not found"))?;
        if !policy::can_mutate(&actor, existing.uploaded_by().id()) {
            return Err(Error::forbidden("cannot delete this document"));
        }

        self.discard_file(document_id, existing.file()).await;
        let removed = self
            .documents
            .delete(document_id)
            .await
            .map_err(map_store_error)?;
        if !removed {
            return Err(Error::not_found("document not found"));
        }
        Ok(())
    }

    async fn delete_many(
        &self,
        actor: &UserId,
        document_ids: &[Uuid],
    ) -> Result<BulkDeleteOutcome, Error> {
        if document_ids.is_empty() {
            return Err(Error::invalid_request("no document ids provided"));
        }
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let found = self
            .documents
            .find_by_ids(document_ids)
            .await
            .map_err(map_store_error)?;

        let mut outcome = BulkDeleteOutcome::default();
        // Staff callers cannot distinguish missing ids from records they do
        // not own, so only reviewers get per-id not-found entries.
        if policy::can_list_all(&actor) {
            let found_ids: HashSet<Uuid> = found.iter().map(Document::id).collect();
            for id in document_ids {
                if !found_ids.contains(id) {
                    outcome
                        .errors
                        .push(format!("Failed to delete {id}: document not found"));
                }
            }
        }

        let candidates = found
            .into_iter()
            .filter(|document| policy::can_mutate(&actor, document.uploaded_by().id()));
        for document in candidates {
            if let Some(reason) = self.discard_file(document.id(), document.file()).await {
                outcome
                    .errors
                    .push(format!("Failed to delete {}: {reason}", document.title()));
            }
            match self.documents.delete(document.id()).await {
                Ok(true) => outcome.deleted += 1,
                Ok(false) => outcome.errors.push(format!(
                    "Failed to delete {}: document not found",
                    document.title()
                )),
                Err(error) => outcome
                    .errors
                    .push(format!("Failed to delete {}: {error}", document.title())),
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "document_service_tests.rs"]
mod tests;
