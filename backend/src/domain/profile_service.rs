//! Profile lookup service for the authenticated caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::actor::resolve_actor;
use crate::domain::ports::{UserProfileQuery, UserRepository};
use crate::domain::user::{User, UserId};

/// Domain service implementing the profile query port.
#[derive(Clone)]
pub struct ProfileService<U> {
    users: Arc<U>,
}

impl<U> ProfileService<U> {
    /// Create a new profile service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UserProfileQuery for ProfileService<U>
where
    U: UserRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        resolve_actor(self.users.as_ref(), user_id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::user::{DisplayName, EmailAddress, Role};

    #[tokio::test]
    async fn returns_the_stored_profile() {
        let actor = UserId::random();
        let user = User::new(
            actor.clone(),
            DisplayName::new("demo_hod").expect("valid name"),
            EmailAddress::new("hod@demo.local").expect("valid email"),
            Role::Hod,
            None,
            true,
        );
        let stored = user.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let service = ProfileService::new(Arc::new(users));
        let profile = service
            .fetch_profile(&actor)
            .await
            .expect("profile resolves");
        assert_eq!(profile, user);
    }

    #[tokio::test]
    async fn unknown_caller_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let service = ProfileService::new(Arc::new(users));
        let error = service
            .fetch_profile(&UserId::random())
            .await
            .expect_err("stale session rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
