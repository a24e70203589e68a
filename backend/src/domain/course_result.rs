//! Course result records, academic sessions, and the result upload command.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::record::{FileAttachment, FileUpload, ReviewStatus};
use crate::domain::user::UserSummary;

/// Maximum length of a course code in characters.
pub const COURSE_CODE_MAX: usize = 20;
/// Maximum length of a course title in characters.
pub const COURSE_TITLE_MAX: usize = 100;
/// Maximum length of an academic session name in characters.
pub const SESSION_NAME_MAX: usize = 20;

/// Validation errors raised when constructing result values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultValidationError {
    EmptyCourseCode,
    CourseCodeTooLong { max: usize },
    CourseTitleTooLong { max: usize },
    EmptySessionName,
    SessionNameTooLong { max: usize },
    UnknownSemester { value: String },
}

impl fmt::Display for ResultValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCourseCode => write!(f, "course code must not be empty"),
            Self::CourseCodeTooLong { max } => {
                write!(f, "course code must be at most {max} characters")
            }
            Self::CourseTitleTooLong { max } => {
                write!(f, "course title must be at most {max} characters")
            }
            Self::EmptySessionName => write!(f, "session name must not be empty"),
            Self::SessionNameTooLong { max } => {
                write!(f, "session name must be at most {max} characters")
            }
            Self::UnknownSemester { value } => {
                write!(f, "invalid semester {value:?}, expected \"first\" or \"second\"")
            }
        }
    }
}

impl std::error::Error for ResultValidationError {}

/// Course code a result belongs to, e.g. `CSC101`.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`COURSE_CODE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseCode(String);

impl CourseCode {
    /// Validate and construct a course code from raw input.
    pub fn new(value: impl Into<String>) -> Result<Self, ResultValidationError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ResultValidationError::EmptyCourseCode);
        }
        if trimmed.chars().count() > COURSE_CODE_MAX {
            return Err(ResultValidationError::CourseCodeTooLong {
                max: COURSE_CODE_MAX,
            });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CourseCode> for String {
    fn from(value: CourseCode) -> Self {
        value.0
    }
}

/// Human readable course title accompanying a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseTitle(String);

impl CourseTitle {
    /// Validate and construct a course title from raw input.
    pub fn new(value: impl Into<String>) -> Result<Self, ResultValidationError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.chars().count() > COURSE_TITLE_MAX {
            return Err(ResultValidationError::CourseTitleTooLong {
                max: COURSE_TITLE_MAX,
            });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CourseTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CourseTitle> for String {
    fn from(value: CourseTitle) -> Self {
        value.0
    }
}

/// Academic period name, e.g. `2023/2024`.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`SESSION_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionName(String);

impl SessionName {
    /// Validate and construct a session name from raw input.
    pub fn new(value: impl Into<String>) -> Result<Self, ResultValidationError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ResultValidationError::EmptySessionName);
        }
        if trimmed.chars().count() > SESSION_NAME_MAX {
            return Err(ResultValidationError::SessionNameTooLong {
                max: SESSION_NAME_MAX,
            });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SessionName> for String {
    fn from(value: SessionName) -> Self {
        value.0
    }
}

/// Half of the academic year a result belongs to.
///
/// Input is case-normalised: `first`, `First`, and `FIRST` all parse to
/// [`Semester::First`]. The canonical stored form is capitalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    /// Parse a semester, accepting any casing of `first` or `second`.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ResultValidationError> {
        match value.as_ref().trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "second" => Ok(Self::Second),
            _ => Err(ResultValidationError::UnknownSemester {
                value: value.as_ref().to_owned(),
            }),
        }
    }

    /// Canonical capitalised form stored and serialised on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "First",
            Self::Second => "Second",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Semester> for String {
    fn from(value: Semester) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for Semester {
    type Error = ResultValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// An academic period results are filed under.
///
/// Sessions are created on demand: uploading a result for an unknown
/// session name creates the session first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicSession {
    id: Uuid,
    name: SessionName,
}

impl AcademicSession {
    /// Assemble a session from its persisted parts.
    pub fn new(id: Uuid, name: SessionName) -> Self {
        Self { id, name }
    }

    /// Stable session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Unique session name.
    pub fn name(&self) -> &SessionName {
        &self.name
    }
}

/// Raw parts used to assemble a [`CourseResult`].
#[derive(Debug, Clone)]
pub struct CourseResultDraft {
    pub id: Uuid,
    pub course_code: CourseCode,
    pub course_title: Option<CourseTitle>,
    pub session: AcademicSession,
    pub semester: Semester,
    pub file: FileAttachment,
    pub status: ReviewStatus,
    pub uploaded_by: UserSummary,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course result record held for departmental review.
///
/// The triple (course code, session, semester) is unique across the store;
/// a second upload for the same triple is rejected rather than merged.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseResult {
    id: Uuid,
    course_code: CourseCode,
    course_title: Option<CourseTitle>,
    session: AcademicSession,
    semester: Semester,
    file: FileAttachment,
    status: ReviewStatus,
    uploaded_by: UserSummary,
    uploaded_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseResult {
    /// Assemble a result from validated parts.
    pub fn new(draft: CourseResultDraft) -> Self {
        let CourseResultDraft {
            id,
            course_code,
            course_title,
            session,
            semester,
            file,
            status,
            uploaded_by,
            uploaded_at,
            updated_at,
        } = draft;
        Self {
            id,
            course_code,
            course_title,
            session,
            semester,
            file,
            status,
            uploaded_by,
            uploaded_at,
            updated_at,
        }
    }

    /// Stable record identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Course code the result belongs to.
    pub fn course_code(&self) -> &CourseCode {
        &self.course_code
    }

    /// Course title, when one was supplied.
    pub fn course_title(&self) -> Option<&CourseTitle> {
        self.course_title.as_ref()
    }

    /// Academic session the result was filed under.
    pub fn session(&self) -> &AcademicSession {
        &self.session
    }

    /// Semester within the session.
    pub fn semester(&self) -> Semester {
        self.semester
    }

    /// Stored file locations and links.
    pub fn file(&self) -> &FileAttachment {
        &self.file
    }

    /// Current review state.
    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Uploader identity snapshot.
    pub fn uploaded_by(&self) -> &UserSummary {
        &self.uploaded_by
    }

    /// Upload timestamp.
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Timestamp of the last mutation, refreshed by approve and reject.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Validated command to create a course result record.
#[derive(Debug, Clone)]
pub struct ResultUpload {
    course_code: CourseCode,
    course_title: Option<CourseTitle>,
    session_name: SessionName,
    semester: Semester,
    file: FileUpload,
}

impl ResultUpload {
    /// Validate raw upload fields into a command.
    ///
    /// A blank course title is treated as absent.
    pub fn try_from_parts(
        course_code: impl Into<String>,
        course_title: Option<&str>,
        session_name: impl Into<String>,
        semester: impl AsRef<str>,
        file: FileUpload,
    ) -> Result<Self, ResultValidationError> {
        let course_code = CourseCode::new(course_code)?;
        let course_title = match course_title.map(str::trim) {
            Some(title) if !title.is_empty() => Some(CourseTitle::new(title)?),
            _ => None,
        };
        let session_name = SessionName::new(session_name)?;
        let semester = Semester::parse(semester)?;
        Ok(Self {
            course_code,
            course_title,
            session_name,
            semester,
            file,
        })
    }

    /// Course code the result belongs to.
    pub fn course_code(&self) -> &CourseCode {
        &self.course_code
    }

    /// Course title, when one was supplied.
    pub fn course_title(&self) -> Option<&CourseTitle> {
        self.course_title.as_ref()
    }

    /// Session name to resolve or create.
    pub fn session_name(&self) -> &SessionName {
        &self.session_name
    }

    /// Semester within the session.
    pub fn semester(&self) -> Semester {
        self.semester
    }

    /// File content to store.
    pub fn file(&self) -> &FileUpload {
        &self.file
    }
}

/// Conjunctive filter criteria for result listings.
///
/// Course code and session name match as substrings; semester matches
/// exactly after case normalisation. Blank criteria are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFilter {
    session: Option<String>,
    semester: Option<Semester>,
    course_code: Option<String>,
}

impl ResultFilter {
    /// Normalise raw query parameters into filter criteria.
    pub fn from_parts(
        session: Option<String>,
        semester: Option<String>,
        course_code: Option<String>,
    ) -> Result<Self, ResultValidationError> {
        let session = session.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        let course_code = course_code
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        let semester = semester
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .map(Semester::parse)
            .transpose()?;
        Ok(Self {
            session,
            semester,
            course_code,
        })
    }

    /// Session name fragment to match.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Semester to match exactly.
    pub fn semester(&self) -> Option<Semester> {
        self.semester
    }

    /// Course code fragment to match.
    pub fn course_code(&self) -> Option<&str> {
        self.course_code.as_deref()
    }

    /// Whether no criteria were supplied.
    pub fn is_empty(&self) -> bool {
        self.session.is_none() && self.semester.is_none() && self.course_code.is_none()
    }
}
