//! Driving port for the course result approval workflow.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::course_result::{AcademicSession, CourseResult, CourseResultDraft, ResultFilter, ResultUpload};
use crate::domain::record::{FileAttachment, ReviewStatus};
use crate::domain::user::{DisplayName, EmailAddress, UserId, UserSummary};
use crate::domain::Error;

use super::BulkDeleteOutcome;

/// Domain use-case port for course result operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultWorkflow: Send + Sync {
    /// List the results visible to the caller.
    async fn list(&self, actor: &UserId) -> Result<Vec<CourseResult>, Error>;

    /// List the caller's visible results matching the filter criteria.
    async fn filter(
        &self,
        actor: &UserId,
        criteria: ResultFilter,
    ) -> Result<Vec<CourseResult>, Error>;

    /// Create a result record from a validated upload.
    async fn upload(&self, actor: &UserId, upload: ResultUpload) -> Result<CourseResult, Error>;

    /// Approve a pending result.
    async fn approve(&self, actor: &UserId, result_id: Uuid) -> Result<CourseResult, Error>;

    /// Reject a pending result.
    async fn reject(&self, actor: &UserId, result_id: Uuid) -> Result<CourseResult, Error>;

    /// Delete a result and best-effort clean up its backing file.
    async fn delete(&self, actor: &UserId, result_id: Uuid) -> Result<(), Error>;

    /// Delete a batch of results, collecting per-item failures.
    async fn delete_many(
        &self,
        actor: &UserId,
        result_ids: &[Uuid],
    ) -> Result<BulkDeleteOutcome, Error>;
}

/// Fixture workflow that behaves like an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResultWorkflow;

impl FixtureResultWorkflow {
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
impl ResultWorkflow for FixtureResultWorkflow {
    async fn list(&self, _actor: &UserId) -> Result<Vec<CourseResult>, Error> {
        Ok(Vec::new())
    }

    async fn filter(
        &self,
        _actor: &UserId,
        _criteria: ResultFilter,
    ) -> Result<Vec<CourseResult>, Error> {
        Ok(Vec::new())
    }

    async fn upload(&self, actor: &UserId, upload: ResultUpload) -> Result<CourseResult, Error> {
        let file_name = upload.file().file_name();
        let file = FileAttachment::local(file_name, format!("results/{file_name}"))
            .map_err(|err| Error::internal(format!("invalid fixture attachment: {err}")))?;
        let now = Utc::now();
        Ok(CourseResult::new(CourseResultDraft {
            id: Uuid::new_v4(),
            course_code: upload.course_code().clone(),
            course_title: upload.course_title().cloned(),
            session: AcademicSession::new(Uuid::new_v4(), upload.session_name().clone()),
            semester: upload.semester(),
            file,
            status: ReviewStatus::Pending,
            uploaded_by: Self::uploader(actor)?,
            uploaded_at: now,
            updated_at: now,
        }))
    }

    async fn approve(&self, _actor: &UserId, _result_id: Uuid) -> Result<CourseResult, Error> {
        Err(Error::not_found("result not found"))
    }

    async fn reject(&self, _actor: &UserId, _result_id: Uuid) -> Result<CourseResult, Error> {
        Err(Error::not_found("result not found"))
    }

    async fn delete(&self, _actor: &UserId, _result_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("result not found"))
    }

    async fn delete_many(
        &self,
        _actor: &UserId,
        result_ids: &[Uuid],
    ) -> Result<BulkDeleteOutcome, Error> {
        if result_ids.is_empty() {
            return Err(Error::invalid_request("no result ids provided"));
        }
        Ok(BulkDeleteOutcome {
            deleted: 0,
            errors: result_ids
                .iter()
                .map(|id| format!("Failed to delete {id}: result not found"))
                .collect(),
        })
    }
}
