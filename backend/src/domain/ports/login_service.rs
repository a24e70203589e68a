//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{
    DepartmentName, DisplayName, EmailAddress, Error, LoginCredentials, Role, User, UserId,
};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user's profile.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Stable id of the fixture head-of-department account.
pub const FIXTURE_HOD_ID: &str = "0b939318-6b45-465c-a1a4-8e569a2fbf2f";
/// Stable id of the fixture staff account.
pub const FIXTURE_STAFF_ID: &str = "a57c3a1e-0f29-4f3f-8d7f-6f27d4a003c6";

/// In-memory authenticator used until persistence is wired.
///
/// Two accounts exist: `hod@demo.local` / `demo123` (head of department)
/// and `staff@demo.local` / `demo123` (staff). Any other pair fails with
/// invalid credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    fn account(id: &str, display_name: &str, email: &str, role: Role) -> Result<User, Error> {
        let build = || -> Result<User, String> {
            Ok(User::new(
                UserId::new(id).map_err(|err| err.to_string())?,
                DisplayName::new(display_name).map_err(|err| err.to_string())?,
                EmailAddress::new(email).map_err(|err| err.to_string())?,
                role,
                Some(DepartmentName::new("Demo Department").map_err(|err| err.to_string())?),
                true,
            ))
        };
        build().map_err(|err| Error::internal(format!("invalid fixture account: {err}")))
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if credentials.password() != "demo123" {
            return Err(Error::unauthorized("invalid credentials"));
        }
        match credentials.email() {
            "hod@demo.local" => Self::account(FIXTURE_HOD_ID, "demo_hod", "hod@demo.local", Role::Hod),
            "staff@demo.local" => {
                Self::account(FIXTURE_STAFF_ID, "demo_staff", "staff@demo.local", Role::Staff)
            }
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}
