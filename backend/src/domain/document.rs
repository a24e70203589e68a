//! Document records and the upload command that creates them.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::record::{FileAttachment, FileUpload, ReviewStatus};
use crate::domain::user::UserSummary;

/// Maximum length of a document title in characters.
pub const TITLE_MAX: usize = 255;

/// Validation errors raised when constructing document values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
}

impl fmt::Display for DocumentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "title must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for DocumentValidationError {}

/// Validated document title.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentTitle(String);

impl DocumentTitle {
    /// Validate and construct a title from raw input.
    pub fn new(value: impl Into<String>) -> Result<Self, DocumentValidationError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(DocumentValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(DocumentValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocumentTitle> for String {
    fn from(value: DocumentTitle) -> Self {
        value.0
    }
}

/// Fold an optional category into the description text.
///
/// A non-blank category is prefixed as a `Category:` line so the stored
/// description carries it without a dedicated column.
pub fn fold_category(category: Option<&str>, description: &str) -> String {
    match category.map(str::trim) {
        Some(category) if !category.is_empty() => {
            format!("Category: {category}\n{description}").trim().to_owned()
        }
        _ => description.trim().to_owned(),
    }
}

/// Raw parts used to assemble a [`Document`].
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub id: Uuid,
    pub title: DocumentTitle,
    pub description: String,
    pub file: FileAttachment,
    pub status: ReviewStatus,
    pub uploaded_by: UserSummary,
    pub uploaded_at: DateTime<Utc>,
}

/// A document record held for departmental review.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: Uuid,
    title: DocumentTitle,
    description: String,
    file: FileAttachment,
    status: ReviewStatus,
    uploaded_by: UserSummary,
    uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Assemble a document from validated parts.
    pub fn new(draft: DocumentDraft) -> Self {
        let DocumentDraft {
            id,
            title,
            description,
            file,
            status,
            uploaded_by,
            uploaded_at,
        } = draft;
        Self {
            id,
            title,
            description,
            file,
            status,
            uploaded_by,
            uploaded_at,
        }
    }

    /// Stable record identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Document title.
    pub fn title(&self) -> &DocumentTitle {
        &self.title
    }

    /// Free-text description, including any folded category line.
    pub fn description(&self) -> &str {
        &self.description
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
}

/// Validated command to create a document record.
///
/// The category, when present, is already folded into the description.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    title: DocumentTitle,
    description: String,
    file: FileUpload,
}

impl DocumentUpload {
    /// Validate raw upload fields into a command.
    pub fn try_from_parts(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Option<&str>,
        file: FileUpload,
    ) -> Result<Self, DocumentValidationError> {
        let title = DocumentTitle::new(title)?;
        let description = fold_category(category, &description.into());
        Ok(Self {
            title,
            description,
            file,
        })
    }

    /// Document title.
    pub fn title(&self) -> &DocumentTitle {
        &self.title
    }

    /// Folded description text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// File content to store.
    pub fn file(&self) -> &FileUpload {
        &self.file
    }
}
