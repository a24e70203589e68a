//! Driving port for role-scoped dashboard statistics.

use async_trait::async_trait;

use crate::domain::user::{DisplayName, EmailAddress, Role, UserId};
use crate::domain::{Error, User};

/// Role-scoped statistics shown on the dashboard.
///
/// `total_documents` and `total_results` cover only the caller's own
/// uploads for staff, and the whole store for a head of department. The
/// pending breakdown is populated for the head of department only.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub user: User,
    pub total_documents: i64,
    pub total_results: i64,
    pub recent_uploads: i64,
    pub pending_approvals: i64,
    pub pending_documents: Option<i64>,
    pub pending_results: Option<i64>,
}

/// Domain use-case port for the dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Assemble the caller's dashboard statistics.
    async fn summarize(&self, actor: &UserId) -> Result<DashboardSummary, Error>;
}

/// Fixture dashboard over an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDashboardQuery;

#[async_trait]
impl DashboardQuery for FixtureDashboardQuery {
    async fn summarize(&self, actor: &UserId) -> Result<DashboardSummary, Error> {
        let build = || -> Result<User, String> {
            Ok(User::new(
                actor.clone(),
                DisplayName::new("demo_staff").map_err(|err| err.to_string())?,
                EmailAddress::new("staff@demo.local").map_err(|err| err.to_string())?,
                Role::Staff,
                None,
                true,
            ))
        };
        let user = build().map_err(|err| Error::internal(format!("invalid fixture user: {err}")))?;
        Ok(DashboardSummary {
            user,
            total_documents: 0,
            total_results: 0,
            recent_uploads: 0,
            pending_approvals: 0,
            pending_documents: None,
            pending_results: None,
        })
    }
}
