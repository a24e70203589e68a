//! Startup seeding orchestration.
//!
//! Ensures the two demonstration accounts (`hod@demo.local` and
//! `staff@demo.local`, password `demo123`) exist so a fresh deployment can
//! be exercised without manual account creation. Seeding is idempotent:
//! accounts that already exist are left untouched.

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
use thiserror::Error;
use tracing::{info, warn};

use crate::demo_data::config::DemoDataSettings;
use crate::domain::ports::{DemoAccount, DemoSeedRepository, DemoSeedRequest};
use crate::domain::{DepartmentName, DisplayName, EmailAddress, Role, UserValidationError};
use crate::outbound::persistence::{DbPool, DieselDemoSeedRepository};

const DEMO_PASSWORD: &str = "demo123";

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// A built-in account definition failed domain validation.
    #[error("invalid demo account: {0}")]
    InvalidAccount(#[from] UserValidationError),
    /// Hashing the demo password failed.
    #[error("failed to hash demo password: {0}")]
    PasswordHash(String),
    /// Seed persistence failed.
    #[error("demo seeding error: {0}")]
    Seeding(#[from] crate::domain::ports::DemoSeedRepositoryError),
}

/// Ensure the demo accounts exist on startup when enabled.
///
/// Returns the number of accounts newly created, or `None` when seeding is
/// disabled or no database pool is configured.
pub async fn seed_demo_accounts_on_startup(
    settings: &DemoDataSettings,
    db_pool: Option<&DbPool>,
) -> Result<Option<usize>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "demo account seeding skipped");
        return Ok(None);
    }

    let Some(db_pool) = db_pool else {
        warn!("demo account seeding enabled but no database is configured; skipping");
        return Ok(None);
    };

    let request = build_seed_request(settings.department())?;
    let repository = DieselDemoSeedRepository::new(db_pool.clone());
    let created = repository.seed_accounts(request).await?;

    if created > 0 {
        info!(created, "demo accounts seeded");
    } else {
        info!("demo accounts already present; nothing seeded");
    }

    Ok(Some(created))
}

fn build_seed_request(department: &str) -> Result<DemoSeedRequest, StartupSeedingError> {
    let password_hash = hash_demo_password()?;
    Ok(DemoSeedRequest {
        department: DepartmentName::new(department)?,
        accounts: vec![
            DemoAccount {
                display_name: DisplayName::new("demo_hod")?,
                email: EmailAddress::new("hod@demo.local")?,
                role: Role::Hod,
                password_hash: password_hash.clone(),
            },
            DemoAccount {
                display_name: DisplayName::new("demo_staff")?,
                email: EmailAddress::new("staff@demo.local")?,
                role: Role::Staff,
                password_hash,
            },
        ],
    })
}

/// Hash the shared demo password with a fresh salt.
///
/// The hash is computed per startup rather than baked in so the stored
/// credential never appears verbatim in the binary.
fn hash_demo_password() -> Result<String, StartupSeedingError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| StartupSeedingError::PasswordHash(err.to_string()))
}
