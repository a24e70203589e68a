//! Caller resolution shared by the workflow services.
//!
//! Every authenticated operation starts from a user id recovered from the
//! session cookie. The id is only trusted once it resolves to a stored
//! account; a stale id from a deleted account is treated the same as no
//! session at all.

use crate::domain::Error;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{User, UserId};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Resolve a session user id to its stored account.
pub(crate) async fn resolve_actor<U>(users: &U, actor: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(actor)
        .await
        .map_err(map_user_persistence_error)?
        .ok_or_else(|| Error::unauthorized("login required"))
}
