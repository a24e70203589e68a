//! Course result workflow domain service.
//!
//! Mirrors the document workflow with two additions: uploads resolve their
//! academic session by name (creating it on first use) and rely on the
//! store's uniqueness of (course code, session, semester), surfacing a
//! violation as a conflict.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::actor::resolve_actor;
use crate::domain::course_result::{CourseResult, CourseResultDraft, ResultFilter, ResultUpload};
use crate::domain::policy;
use crate::domain::ports::{
    AcademicSessionRepository, AcademicSessionStoreError, BulkDeleteOutcome, FileCategory,
    FileStore, FileStoreError, ResultRepository, ResultStoreError, ResultWorkflow, UserRepository,
};
use crate::domain::record::{FileAttachment, ReviewStatus, ReviewTransition};
use crate::domain::user::UserId;

fn map_store_error(error: ResultStoreError) -> Error {
    match error {
        ResultStoreError::Connection { message } => {
            Error::service_unavailable(format!("result store unavailable: {message}"))
        }
        ResultStoreError::Query { message } => {
            Error::internal(format!("result store error: {message}"))
        }
        ResultStoreError::Duplicate { message } => Error::conflict(message),
    }
}

fn map_session_error(error: AcademicSessionStoreError) -> Error {
    match error {
        AcademicSessionStoreError::Connection { message } => {
            Error::service_unavailable(format!("session store unavailable: {message}"))
        }
        AcademicSessionStoreError::Query { message } => {
            Error::internal(format!("session store error: {message}"))
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

/// Domain service implementing the result workflow port.
#[derive(Clone)]
pub struct ResultWorkflowService<R, U, S, F> {
    results: Arc<R>,
    users: Arc<U>,
    sessions: Arc<S>,
    files: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<R, U, S, F> ResultWorkflowService<R, U, S, F> {
    /// Create a new workflow service over the given ports.
    pub fn new(
        results: Arc<R>,
        users: Arc<U>,
        sessions: Arc<S>,
        files: Arc<F>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            results,
            users,
            sessions,
            files,
            clock,
        }
    }
}

impl<R, U, S, F> ResultWorkflowService<R, U, S, F>
where
    R: ResultRepository,
    U: UserRepository,
    S: AcademicSessionRepository,
    F: FileStore,
{
    async fn review(
        &self,
        actor: &UserId,
        result_id: Uuid,
        decision: ReviewStatus,
    ) -> Result<CourseResult, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let existing = self
            .results
            .find_by_id(result_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("result not found"))?;
        if !policy::can_approve(&actor) {
            return Err(Error::forbidden("permission denied"));
        }

        match existing.status().review_transition(decision) {
            ReviewTransition::NoOp => Ok(existing),
            ReviewTransition::Conflict => Err(Error::conflict(format!(
                "result already {}",
                existing.status().as_str().to_lowercase()
            ))),
            ReviewTransition::Apply => self
                .results
                .set_status(result_id, decision, self.clock.utc())
                .await
                .map_err(map_store_error)?
                .ok_or_else(|| Error::not_found("result not found")),
        }
    }

    /// Remove the backing file, logging failures instead of surfacing them.
    async fn discard_file(&self, result_id: Uuid, attachment: &FileAttachment) -> Option<String> {
        match self.files.remove(attachment).await {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(
                    result_id = %result_id,
                    error = %error,
                    "result file cleanup failed"
                );
                Some(error.to_string())
            }
        }
    }
}

#[async_trait]
impl<R, U, S, F> ResultWorkflow for ResultWorkflowService<R, U, S, F>
where
    R: ResultRepository,
    U: UserRepository,
    S: AcademicSessionRepository,
    F: FileStore,
{
    async fn list(&self, actor: &UserId) -> Result<Vec<CourseResult>, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let results = if policy::can_list_all(&actor) {
            self.results.list_all().await
        } else {
            self.results.list_owned_by(actor.id()).await
        };
        results.map_err(map_store_error)
    }

    async fn filter(
        &self,
        actor: &UserId,
        criteria: ResultFilter,
    ) -> Result<Vec<CourseResult>, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let scope = (!policy::can_list_all(&actor)).then(|| actor.id().clone());
        self.results
            .filter(scope, &criteria)
            .await
            .map_err(map_store_error)
    }

    async fn upload(&self, actor: &UserId, upload: ResultUpload) -> Result<CourseResult, Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        if !policy::can_create(&actor) {
            return Err(Error::forbidden("user account is disabled"));
        }

        let session = self
            .sessions
            .get_or_create(upload.session_name())
            .await
            .map_err(map_session_error)?;
        let file = self
            .files
            .store(upload.file(), FileCategory::Results)
            .await
            .map_err(map_file_error)?;
        let now = self.clock.utc();
        let result = CourseResult::new(CourseResultDraft {
            id: Uuid::new_v4(),
            course_code: upload.course_code().clone(),
            course_title: upload.course_title().cloned(),
            session,
            semester: upload.semester(),
            file,
            status: ReviewStatus::Pending,
            uploaded_by: actor.summary(),
            uploaded_at: now,
            updated_at: now,
        });

        if let Err(error) = self.results.insert(&result).await {
            // The stored file would otherwise be orphaned.
            self.discard_file(result.id(), result.file()).await;
            return Err(map_store_error(error));
        }
        Ok(result)
    }

    async fn approve(&self, actor: &UserId, result_id: Uuid) -> Result<CourseResult, Error> {
        self.review(actor, result_id, ReviewStatus::Approved).await
    }

    async fn reject(&self, actor: &UserId, result_id: Uuid) -> Result<CourseResult, Error> {
        self.review(actor, result_id, ReviewStatus::Rejected).await
    }

    async fn delete(&self, actor: &UserId, result_id: Uuid) -> Result<(), Error> {
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let existing = self
            .results
            .find_by_id(result_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("result not found"))?;
        if !policy::can_mutate(&actor, existing.uploaded_by().id()) {
            return Err(Error::forbidden("cannot delete this result"));
        }

        self.discard_file(result_id, existing.file()).await;
        let removed = self
            .results
            .delete(result_id)
            .await
            .map_err(map_store_error)?;
        if !removed {
            return Err(Error::not_found("result not found"));
        }
        Ok(())
    }

    async fn delete_many(
        &self,
        actor: &UserId,
        result_ids: &[Uuid],
    ) -> Result<BulkDeleteOutcome, Error> {
        if result_ids.is_empty() {
            return Err(Error::invalid_request("no result ids provided"));
        }
        let actor = resolve_actor(self.users.as_ref(), actor).await?;
        let found = self
            .results
            .find_by_ids(result_ids)
            .await
            .map_err(map_store_error)?;

        let mut outcome = BulkDeleteOutcome::default();
        // Staff callers cannot distinguish missing ids from records they do
        // not own, so only reviewers get per-id not-found entries.
        if policy::can_list_all(&actor) {
            let found_ids: HashSet<Uuid> = found.iter().map(CourseResult::id).collect();
            for id in result_ids {
                if !found_ids.contains(id) {
                    outcome
                        .errors
                        .push(format!("Failed to delete {id}: result not found"));
                }
            }
        }

        let candidates = found
            .into_iter()
            .filter(|result| policy::can_mutate(&actor, result.uploaded_by().id()));
        for result in candidates {
            if let Some(reason) = self.discard_file(result.id(), result.file()).await {
                outcome
                    .errors
                    .push(format!("Failed to delete {}: {reason}", result.course_code()));
            }
            match self.results.delete(result.id()).await {
                Ok(true) => outcome.deleted += 1,
                Ok(false) => outcome.errors.push(format!(
                    "Failed to delete {}: result not found",
                    result.course_code()
                )),
                Err(error) => outcome
                    .errors
                    .push(format!("Failed to delete {}: {error}", result.course_code())),
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "result_service_tests.rs"]
mod tests;
