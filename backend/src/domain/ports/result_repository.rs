//! Port for course result persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::course_result::{CourseResult, ResultFilter};
use crate::domain::record::ReviewStatus;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by result repository adapters.
    pub enum ResultStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "result store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "result store query failed: {message}",
        /// The (course code, session, semester) triple already exists.
        Duplicate { message: String } => "result already exists: {message}",
    }
}

/// Port for reading and writing course result records.
///
/// Listings are ordered by creation timestamp descending with ties broken
/// by id ascending. The uniqueness of (course_code, session, semester) is
/// enforced by the backing store; adapters surface violations as
/// [`ResultStoreError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Persist a new result record.
    async fn insert(&self, result: &CourseResult) -> Result<(), ResultStoreError>;

    /// Fetch a result by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseResult>, ResultStoreError>;

    /// Fetch every result matching one of the given ids.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CourseResult>, ResultStoreError>;

    /// List every result in the store.
    async fn list_all(&self) -> Result<Vec<CourseResult>, ResultStoreError>;

    /// List the results uploaded by one user.
    async fn list_owned_by(&self, owner: &UserId) -> Result<Vec<CourseResult>, ResultStoreError>;

    /// List results matching the filter criteria, optionally scoped to one
    /// uploader.
    async fn filter(
        &self,
        scope: Option<UserId>,
        criteria: &ResultFilter,
    ) -> Result<Vec<CourseResult>, ResultStoreError>;

    /// Update the review status of a result, refreshing its update
    /// timestamp. Returns the refreshed record or `None` when the id no
    /// longer resolves.
    async fn set_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<CourseResult>, ResultStoreError>;

    /// Remove a result record, reporting whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ResultStoreError>;

    /// Count every result in the store.
    async fn count_all(&self) -> Result<i64, ResultStoreError>;

    /// Count the results uploaded by one user.
    async fn count_owned_by(&self, owner: &UserId) -> Result<i64, ResultStoreError>;

    /// Count the results still awaiting review.
    async fn count_pending(&self) -> Result<i64, ResultStoreError>;
}

/// Fixture repository backed by nothing; reads are empty, writes succeed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResultRepository;

#[async_trait]
impl ResultRepository for FixtureResultRepository {
    async fn insert(&self, _result: &CourseResult) -> Result<(), ResultStoreError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<CourseResult>, ResultStoreError> {
        Ok(None)
    }

    async fn find_by_ids(&self, _ids: &[Uuid]) -> Result<Vec<CourseResult>, ResultStoreError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<CourseResult>, ResultStoreError> {
        Ok(Vec::new())
    }

    async fn list_owned_by(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<CourseResult>, ResultStoreError> {
        Ok(Vec::new())
    }

    async fn filter(
        &self,
        _scope: Option<UserId>,
        _criteria: &ResultFilter,
    ) -> Result<Vec<CourseResult>, ResultStoreError> {
        Ok(Vec::new())
    }

    async fn set_status(
        &self,
        _id: Uuid,
        _status: ReviewStatus,
        _updated_at: DateTime<Utc>,
    ) -> Result<Option<CourseResult>, ResultStoreError> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, ResultStoreError> {
        Ok(false)
    }

    async fn count_all(&self) -> Result<i64, ResultStoreError> {
        Ok(0)
    }

    async fn count_owned_by(&self, _owner: &UserId) -> Result<i64, ResultStoreError> {
        Ok(0)
    }

    async fn count_pending(&self) -> Result<i64, ResultStoreError> {
        Ok(0)
    }
}
