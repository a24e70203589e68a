//! Authentication data model and validation helpers.

use std::fmt;

use zeroize::Zeroizing;

/// Validation errors for login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// The email was empty or whitespace.
    EmptyEmail,
    /// The password was empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// The password is held in a [`Zeroizing`] wrapper so it is wiped from
/// memory when the credentials are dropped. The email is kept verbatim
/// apart from surrounding whitespace; a malformed address simply never
/// matches an account.
///
/// # Examples
///
/// ```
/// use backend::domain::LoginCredentials;
///
/// let credentials = LoginCredentials::try_from_parts("hod@demo.local", "demo123")
///     .expect("valid credentials");
/// assert_eq!(credentials.email(), "hod@demo.local");
/// ```
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login input into credentials.
    ///
    /// The email is trimmed; the password is taken as supplied, since
    /// surrounding whitespace may be part of it.
    pub fn try_from_parts(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, LoginValidationError> {
        let email = email.into().trim().to_owned();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    /// Email address used to look up the account.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password to verify against the stored hash.
    pub fn password(&self) -> &str {
        &self.password
    }
}
