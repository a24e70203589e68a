//! User data model: identifiers, role, and profile value types.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// Validation errors returned by the user value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
    InvalidEmail,
    EmptyDepartment,
    DepartmentTooLong { max: usize },
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => {
                write!(f, "display name must not contain control characters")
            }
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyDepartment => write!(f, "department name must not be empty"),
            Self::DepartmentTooLong { max } => {
                write!(f, "department name must be at most {max} characters")
            }
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    /// Construct a [`UserId`] from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Workflow role assigned to a user account.
///
/// The role set is closed: any value other than the canonical uppercase
/// `HOD` or `STAFF` is rejected rather than defaulted, so a corrupted or
/// unknown role can never acquire permissions by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Head of department: reviews and administers every record.
    Hod,
    /// Regular staff member: manages their own uploads only.
    Staff,
}

impl Role {
    /// Parse a canonical role string, failing closed on unknown values.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        match value.as_ref() {
            "HOD" => Ok(Self::Hod),
            "STAFF" => Ok(Self::Staff),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }

    /// Canonical uppercase form stored and serialised on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hod => "HOD",
            Self::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for Role {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 120;

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if display_name.chars().any(char::is_control) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Validated staff email address, used as the login handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.chars().count() > EMAIL_MAX || !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Name of the department a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentName(String);

/// Maximum allowed length for a department name.
pub const DEPARTMENT_MAX: usize = 100;

impl DepartmentName {
    /// Validate and construct a [`DepartmentName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyDepartment);
        }
        if name.chars().count() > DEPARTMENT_MAX {
            return Err(UserValidationError::DepartmentTooLong {
                max: DEPARTMENT_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DepartmentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DepartmentName> for String {
    fn from(value: DepartmentName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DepartmentName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` must be a valid UUID string.
/// - `role` is one of the closed set of workflow roles.
/// - `department` is absent when the user is unassigned.
/// - Only users with `approved` set may hold an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    email: EmailAddress,
    role: Role,
    department: Option<DepartmentName>,
    approved: bool,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(
        id: UserId,
        display_name: DisplayName,
        email: EmailAddress,
        role: Role,
        department: Option<DepartmentName>,
        approved: bool,
    ) -> Self {
        Self {
            id,
            display_name,
            email,
            role,
            department,
            approved,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Email address used to authenticate.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Workflow role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Department the user belongs to, when assigned.
    pub fn department(&self) -> Option<&DepartmentName> {
        self.department.as_ref()
    }

    /// Whether the account has been approved for sign-in.
    pub fn approved(&self) -> bool {
        self.approved
    }

    /// Snapshot of the identifying fields used to attribute uploads.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Identifying snapshot of a user attached to records they uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserSummaryDto", into = "UserSummaryDto")]
pub struct UserSummary {
    id: UserId,
    display_name: DisplayName,
    email: EmailAddress,
}

impl UserSummary {
    /// Build a summary from validated components.
    pub fn new(id: UserId, display_name: DisplayName, email: EmailAddress) -> Self {
        Self {
            id,
            display_name,
            email,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name of the uploader.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Email address of the uploader.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        user.summary()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    #[serde(alias = "display_name")]
    display_name: String,
    email: String,
    role: String,
    department: Option<String>,
    approved: bool,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            display_name,
            email,
            role,
            department,
            approved,
        } = value;
        Self {
            id: id.to_string(),
            display_name: display_name.into(),
            email: email.into(),
            role: role.as_str().to_owned(),
            department: department.map(String::from),
            approved,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::new(value.id)?,
            DisplayName::new(value.display_name)?,
            EmailAddress::new(value.email)?,
            Role::parse(value.role)?,
            value.department.map(DepartmentName::new).transpose()?,
            value.approved,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSummaryDto {
    id: String,
    #[serde(alias = "display_name")]
    display_name: String,
    email: String,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(value: UserSummary) -> Self {
        let UserSummary {
            id,
            display_name,
            email,
        } = value;
        Self {
            id: id.to_string(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

impl TryFrom<UserSummaryDto> for UserSummary {
    type Error = UserValidationError;

    fn try_from(value: UserSummaryDto) -> Result<Self, Self::Error> {
        Ok(UserSummary::new(
            UserId::new(value.id)?,
            DisplayName::new(value.display_name)?,
            EmailAddress::new(value.email)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for user value-type validation.
    use rstest::rstest;

    use super::*;

    fn sample_user() -> User {
        User::new(
            UserId::random(),
            DisplayName::new("Demo Staff").expect("valid display name"),
            EmailAddress::new("staff@demo.local").expect("valid email"),
            Role::Staff,
            Some(DepartmentName::new("Computer Science").expect("valid department")),
            true,
        )
    }

    #[rstest]
    #[case("HOD", Ok(Role::Hod))]
    #[case("STAFF", Ok(Role::Staff))]
    #[case("hod", Err(()))]
    #[case("Staff", Err(()))]
    #[case("ADMIN", Err(()))]
    #[case("", Err(()))]
    fn role_parsing_fails_closed(#[case] input: &str, #[case] expected: Result<Role, ()>) {
        let parsed = Role::parse(input);
        match expected {
            Ok(role) => assert_eq!(parsed, Ok(role)),
            Err(()) => assert!(matches!(
                parsed,
                Err(UserValidationError::UnknownRole { .. })
            )),
        }
    }

    #[test]
    fn role_serialises_to_canonical_uppercase() {
        let encoded = serde_json::to_value(Role::Hod).expect("serialise role");
        assert_eq!(encoded, serde_json::json!("HOD"));
    }

    #[rstest]
    #[case("staff@demo.local", true)]
    #[case("no-at-sign", false)]
    #[case("two@@signs.example", false)]
    #[case("user@nodot", false)]
    #[case("with space@demo.local", false)]
    #[case("", false)]
    fn email_validation(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(input).is_ok(), valid);
    }

    #[test]
    fn email_rejects_overlong_input() {
        let local = "a".repeat(EMAIL_MAX);
        assert!(EmailAddress::new(format!("{local}@demo.local")).is_err());
    }

    #[test]
    fn display_name_rejects_control_characters() {
        assert_eq!(
            DisplayName::new("bad\nname"),
            Err(UserValidationError::DisplayNameInvalidCharacters)
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn display_name_rejects_blank_input(#[case] input: &str) {
        assert_eq!(
            DisplayName::new(input),
            Err(UserValidationError::EmptyDisplayName)
        );
    }

    #[test]
    fn user_id_rejects_padded_uuid() {
        let err = UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6").expect_err("padded id");
        assert_eq!(err, UserValidationError::InvalidId);
    }

    #[test]
    fn user_round_trips_through_camel_case_json() {
        let user = sample_user();
        let encoded = serde_json::to_value(&user).expect("serialise user");
        assert!(encoded.get("displayName").is_some());
        assert_eq!(encoded["role"], "STAFF");
        assert_eq!(encoded["approved"], true);
        assert_eq!(encoded["department"], "Computer Science");

        let decoded: User = serde_json::from_value(encoded).expect("deserialise user");
        assert_eq!(decoded, user);
    }

    #[test]
    fn user_deserialisation_rejects_unknown_role() {
        let payload = serde_json::json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "displayName": "Demo",
            "email": "demo@demo.local",
            "role": "SUPERUSER",
            "department": null,
            "approved": true,
        });
        let decoded: Result<User, _> = serde_json::from_value(payload);
        assert!(decoded.is_err());
    }

    #[test]
    fn summary_preserves_identifying_fields() {
        let user = sample_user();
        let summary = user.summary();
        assert_eq!(summary.id(), user.id());
        assert_eq!(summary.display_name(), user.display_name());
        assert_eq!(summary.email(), user.email());
    }

    #[test]
    fn summary_serialises_in_camel_case() {
        let summary = sample_user().summary();
        let encoded = serde_json::to_value(&summary).expect("serialise summary");
        assert!(encoded.get("displayName").is_some());
        assert!(encoded.get("email").is_some());
        assert!(encoded.get("role").is_none());
    }
}
