//! Port for academic session persistence adapters and their errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::course_result::{AcademicSession, SessionName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by academic session repository adapters.
    pub enum AcademicSessionStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session store query failed: {message}",
    }
}

/// Port for resolving academic sessions by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AcademicSessionRepository: Send + Sync {
    /// Return the session with the given name, creating it when absent.
    async fn get_or_create(
        &self,
        name: &SessionName,
    ) -> Result<AcademicSession, AcademicSessionStoreError>;
}

/// Fixture repository minting a fresh session for every name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAcademicSessionRepository;

#[async_trait]
impl AcademicSessionRepository for FixtureAcademicSessionRepository {
    async fn get_or_create(
        &self,
        name: &SessionName,
    ) -> Result<AcademicSession, AcademicSessionStoreError> {
        Ok(AcademicSession::new(Uuid::new_v4(), name.clone()))
    }
}
