//! Port abstraction for seeding demonstration accounts.
//!
//! This port encapsulates the persistence needed to create the demo
//! department and its two login accounts idempotently. Adapters should make
//! the department and account inserts atomic so a partial seed never leaves
//! an account without its department.

use async_trait::async_trait;

use crate::domain::user::{DepartmentName, DisplayName, EmailAddress, Role};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by demo seed repository adapters.
    pub enum DemoSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "demo seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "demo seeding query failed: {message}",
    }
}

/// One demonstration account to ensure exists.
#[derive(Debug, Clone)]
pub struct DemoAccount {
    pub display_name: DisplayName,
    pub email: EmailAddress,
    pub role: Role,
    /// Argon2 PHC string for the account password.
    pub password_hash: String,
}

/// Request payload for a demo seed run.
#[derive(Debug, Clone)]
pub struct DemoSeedRequest {
    /// Department the accounts belong to, created when absent.
    pub department: DepartmentName,
    /// Accounts to ensure exist, keyed by email.
    pub accounts: Vec<DemoAccount>,
}

/// Port for applying demo account seeds.
///
/// Implementations upsert by email and must be safe to run on every
/// startup; re-seeding an existing account is a no-op reported in the
/// created count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DemoSeedRepository: Send + Sync {
    /// Ensure the demo department and accounts exist.
    ///
    /// Returns the number of accounts newly created.
    async fn seed_accounts(
        &self,
        request: DemoSeedRequest,
    ) -> Result<usize, DemoSeedRepositoryError>;
}
