//! Diesel-backed `LoginService` adapter verifying Argon2 password hashes.
//!
//! Looks up the account by email, verifies the supplied password against
//! the stored PHC string, and rejects unapproved accounts. Unknown emails,
//! wrong passwords, and unapproved accounts all fail with the same
//! `invalid credentials` message so callers cannot probe which accounts
//! exist.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use async_trait::async_trait;

use crate::domain::ports::{LoginService, UserPersistenceError};
use crate::domain::{Error, LoginCredentials, User};

use super::diesel_user_repository::DieselUserRepository;

/// Diesel-backed `LoginService` over the user repository.
#[derive(Clone)]
pub struct DieselLoginService {
    user_repository: DieselUserRepository,
}

impl DieselLoginService {
    /// Create a new service backed by a Diesel user repository.
    pub fn new(user_repository: DieselUserRepository) -> Self {
        Self { user_repository }
    }
}

/// Map user persistence errors onto domain error codes.
fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Verify a password against a stored Argon2 PHC string.
///
/// A malformed stored hash is an operational fault, not a caller mistake,
/// and surfaces as an internal error.
fn verify_password(stored_hash: &str, password: &str) -> Result<(), Error> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| Error::internal(format!("stored password hash is invalid: {err}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| Error::unauthorized("invalid credentials"))
}

/// Reject accounts that have not been approved for login.
fn require_approved(user: User) -> Result<User, Error> {
    if !user.approved() {
        return Err(Error::unauthorized("invalid credentials"));
    }
    Ok(user)
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let found = self
            .user_repository
            .find_with_password_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;

        let Some((user, stored_hash)) = found else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        verify_password(&stored_hash, credentials.password())?;
        require_approved(user)
    }
}
