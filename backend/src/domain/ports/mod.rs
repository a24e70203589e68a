//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod academic_session_repository;
mod dashboard_query;
mod demo_seed_repository;
mod document_repository;
mod document_workflow;
mod file_store;
mod login_service;
mod result_repository;
mod result_workflow;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use academic_session_repository::MockAcademicSessionRepository;
pub use academic_session_repository::{
    AcademicSessionRepository, AcademicSessionStoreError, FixtureAcademicSessionRepository,
};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::{DashboardQuery, DashboardSummary, FixtureDashboardQuery};
#[cfg(test)]
pub use demo_seed_repository::MockDemoSeedRepository;
pub use demo_seed_repository::{
    DemoAccount, DemoSeedRepository, DemoSeedRepositoryError, DemoSeedRequest,
};
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{DocumentRepository, DocumentStoreError, FixtureDocumentRepository};
#[cfg(test)]
pub use document_workflow::MockDocumentWorkflow;
pub use document_workflow::{BulkDeleteOutcome, DocumentWorkflow, FixtureDocumentWorkflow};
#[cfg(test)]
pub use file_store::MockFileStore;
pub use file_store::{FileCategory, FileStore, FileStoreError, FixtureFileStore};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_HOD_ID, FIXTURE_STAFF_ID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use result_repository::MockResultRepository;
pub use result_repository::{FixtureResultRepository, ResultRepository, ResultStoreError};
#[cfg(test)]
pub use result_workflow::MockResultWorkflow;
pub use result_workflow::{FixtureResultWorkflow, ResultWorkflow};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::{FixtureUserProfileQuery, UserProfileQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
