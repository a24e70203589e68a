//! Driving port for user profile queries.
//!
//! Inbound adapters use this port to load a user's profile without importing
//! persistence details. Fixture implementations keep HTTP handlers testable
//! before databases are wired.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, Error, Role, User, UserId};

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}

/// Fixture profile query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileQuery;

#[async_trait]
impl UserProfileQuery for FixtureUserProfileQuery {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        let build = || -> Result<User, String> {
            Ok(User::new(
                user_id.clone(),
                DisplayName::new("demo_staff").map_err(|err| err.to_string())?,
                EmailAddress::new("staff@demo.local").map_err(|err| err.to_string())?,
                Role::Staff,
                None,
                true,
            ))
        };
        build().map_err(|err| Error::internal(format!("invalid fixture profile: {err}")))
    }
}
