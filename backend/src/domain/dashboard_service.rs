//! Role-scoped dashboard statistics service.
//!
//! Every caller sees their own upload counts; heads of department
//! additionally see store-wide totals and the pending-review backlog.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::actor::resolve_actor;
use crate::domain::policy;
use crate::domain::ports::{
    DashboardQuery, DashboardSummary, DocumentRepository, DocumentStoreError, ResultRepository,
    ResultStoreError, UserRepository,
};
use crate::domain::user::UserId;

fn map_document_error(error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Connection { message } => {
            Error::service_unavailable(format!("document store unavailable: {message}"))
        }
        DocumentStoreError::Query { message } => {
            Error::internal(format!("document store error: {message}"))
        }
    }
}

fn map_result_error(error: ResultStoreError) -> Error {
    match error {
        ResultStoreError::Connection { message } => {
            Error::service_unavailable(format!("result store unavailable: {message}"))
        }
        ResultStoreError::Query { message } | ResultStoreError::Duplicate { message } => {
            Error::internal(format!("result store error: {message}"))
        }
    }
}

/// Domain service implementing the dashboard query port.
#[derive(Clone)]
pub struct DashboardService<D, R, U> {
    documents: Arc<D>,
    results: Arc<R>,
    users: Arc<U>,
}

impl<D, R, U> DashboardService<D, R, U> {
    /// Create a new dashboard service over the given ports.
    pub fn new(documents: Arc<D>, results: Arc<R>, users: Arc<U>) -> Self {
        Self {
            documents,
            results,
            users,
        }
    }
}

#[async_trait]
impl<D, R, U> DashboardQuery for DashboardService<D, R, U>
where
    D: DocumentRepository,
    R: ResultRepository,
    U: UserRepository,
{
    async fn summarize(&self, actor: &UserId) -> Result<DashboardSummary, Error> {
        let user = resolve_actor(self.users.as_ref(), actor).await?;
        let own_documents = self
            .documents
            .count_owned_by(user.id())
            .await
            .map_err(map_document_error)?;
        let own_results = self
            .results
            .count_owned_by(user.id())
            .await
            .map_err(map_result_error)?;

        let mut summary = DashboardSummary {
            user,
            total_documents: own_documents,
            total_results: own_results,
            recent_uploads: own_documents + own_results,
            pending_approvals: 0,
            pending_documents: None,
            pending_results: None,
        };

        if policy::can_list_all(&summary.user) {
            summary.total_documents = self
                .documents
                .count_all()
                .await
                .map_err(map_document_error)?;
            summary.total_results = self.results.count_all().await.map_err(map_result_error)?;
            let pending_documents = self
                .documents
                .count_pending()
                .await
                .map_err(map_document_error)?;
            let pending_results = self
                .results
                .count_pending()
                .await
                .map_err(map_result_error)?;
            summary.pending_documents = Some(pending_documents);
            summary.pending_results = Some(pending_results);
            summary.pending_approvals = pending_documents + pending_results;
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "dashboard_service_tests.rs"]
mod tests;
