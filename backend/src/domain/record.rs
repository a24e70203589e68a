//! Review lifecycle primitives shared by documents and course results.
//!
//! Both record kinds move through the same approval states and carry an
//! uploaded file that may live in Drive, on local disk, or both. The types
//! here enforce those shared invariants once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors raised by the shared record value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    UnknownStatus { value: String },
    EmptyFileName,
    InvalidFileName,
    EmptyFile,
    MissingFileLocation,
    ConflictingFileLocations,
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStatus { value } => write!(f, "unknown review status: {value}"),
            Self::EmptyFileName => write!(f, "file name must not be empty"),
            Self::InvalidFileName => {
                write!(f, "file name must not contain path separators or '..'")
            }
            Self::EmptyFile => write!(f, "file content must not be empty"),
            Self::MissingFileLocation => {
                write!(f, "file must have a Drive id or a local path")
            }
            Self::ConflictingFileLocations => {
                write!(f, "file must not have both a Drive id and a local path")
            }
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// Approval state of an uploaded record.
///
/// The state machine is `PENDING -> APPROVED | REJECTED`; the terminal
/// states never transition again. Parsing fails closed on unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReviewStatus {
    /// Awaiting a decision from the head of department.
    Pending,
    /// Accepted; visible as approved to every role.
    Approved,
    /// Declined; retained for the uploader's records.
    Rejected,
}

impl ReviewStatus {
    /// Parse a canonical status string, failing closed on unknown values.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        match value.as_ref() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(RecordValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }

    /// Canonical uppercase form stored and serialised on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Classify a requested review decision against the current state.
    ///
    /// Repeating a decision that already took effect is a no-op rather than
    /// an error, so retried approve/reject requests stay safe.
    pub fn review_transition(self, target: ReviewStatus) -> ReviewTransition {
        if !target.is_terminal() {
            return ReviewTransition::Conflict;
        }
        match self {
            Self::Pending => ReviewTransition::Apply,
            current if current == target => ReviewTransition::NoOp,
            _ => ReviewTransition::Conflict,
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ReviewStatus> for String {
    fn from(value: ReviewStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for ReviewStatus {
    type Error = RecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Outcome of classifying a review decision against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTransition {
    /// The decision moves the record out of the pending state.
    Apply,
    /// The decision already took effect; nothing changes.
    NoOp,
    /// The decision contradicts a different terminal state.
    Conflict,
}

/// File content submitted with an upload request.
///
/// ## Invariants
/// - `file_name` is non-empty and contains no path separators.
/// - `content` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    content: Vec<u8>,
    mime_type: Option<String>,
}

impl FileUpload {
    /// Validate and construct an upload from raw parts.
    pub fn try_from_parts(
        file_name: impl Into<String>,
        content: Vec<u8>,
        mime_type: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(RecordValidationError::EmptyFileName);
        }
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return Err(RecordValidationError::InvalidFileName);
        }
        if content.is_empty() {
            return Err(RecordValidationError::EmptyFile);
        }
        Ok(Self {
            file_name,
            content,
            mime_type,
        })
    }

    /// Original file name supplied by the uploader.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw file bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Declared MIME type, when provided.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

/// Where an uploaded file ended up, with any share links issued for it.
///
/// ## Invariants
/// - Exactly one of `drive_file_id` or `local_path` is present. A file
///   relocated to Drive never keeps a local copy; a local fallback never
///   carries Drive links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    file_name: String,
    drive_file_id: Option<String>,
    drive_view_link: Option<String>,
    drive_download_link: Option<String>,
    local_path: Option<String>,
}

impl FileAttachment {
    /// Construct an attachment stored in Drive.
    pub fn remote(
        file_name: impl Into<String>,
        drive_file_id: impl Into<String>,
        drive_view_link: Option<String>,
        drive_download_link: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        Self::from_parts(
            file_name.into(),
            Some(drive_file_id.into()),
            drive_view_link,
            drive_download_link,
            None,
        )
    }

    /// Construct an attachment stored on local disk.
    pub fn local(
        file_name: impl Into<String>,
        local_path: impl Into<String>,
    ) -> Result<Self, RecordValidationError> {
        Self::from_parts(file_name.into(), None, None, None, Some(local_path.into()))
    }

    /// Reassemble an attachment from persisted parts.
    pub fn from_parts(
        file_name: String,
        drive_file_id: Option<String>,
        drive_view_link: Option<String>,
        drive_download_link: Option<String>,
        local_path: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        if file_name.trim().is_empty() {
            return Err(RecordValidationError::EmptyFileName);
        }
        let missing_drive = drive_file_id.as_deref().is_none_or(str::is_empty);
        let missing_local = local_path.as_deref().is_none_or(str::is_empty);
        if missing_drive && missing_local {
            return Err(RecordValidationError::MissingFileLocation);
        }
        if !missing_drive && !missing_local {
            return Err(RecordValidationError::ConflictingFileLocations);
        }
        Ok(Self {
            file_name,
            drive_file_id,
            drive_view_link,
            drive_download_link,
            local_path,
        })
    }

    /// Original file name supplied by the uploader.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Drive file identifier, when the file was relocated to Drive.
    pub fn drive_file_id(&self) -> Option<&str> {
        self.drive_file_id.as_deref()
    }

    /// Browser view link issued by Drive.
    pub fn drive_view_link(&self) -> Option<&str> {
        self.drive_view_link.as_deref()
    }

    /// Direct download link issued by Drive.
    pub fn drive_download_link(&self) -> Option<&str> {
        self.drive_download_link.as_deref()
    }

    /// Path relative to the upload directory, when stored locally.
    pub fn local_path(&self) -> Option<&str> {
        self.local_path.as_deref()
    }
}
