//! Port for the external file store that holds uploaded record content.
//!
//! The workflow engine never talks to a disk or a cloud drive directly; it
//! hands bytes to this port and receives back the attachment describing
//! where they ended up. Failures here are recoverable by design: a failed
//! store during create degrades to another backend, a failed removal during
//! delete is logged and ignored.

use async_trait::async_trait;

use crate::domain::record::{FileAttachment, FileUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by file store adapters.
    pub enum FileStoreError {
        /// The store was unreachable or the request timed out.
        Transport { message: String } => "file store transport failed: {message}",
        /// The store answered but refused or mangled the request.
        Rejected { message: String } => "file store rejected the request: {message}",
        /// Local filesystem operation failed.
        Io { message: String } => "file store io failed: {message}",
    }
}

/// Folder a stored file is grouped under, one per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Documents,
    Results,
}

impl FileCategory {
    /// Folder name used by the storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Results => "results",
        }
    }
}

/// Port for storing and removing uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist the upload and return where it landed.
    async fn store(
        &self,
        upload: &FileUpload,
        category: FileCategory,
    ) -> Result<FileAttachment, FileStoreError>;

    /// Remove the backing file for an attachment.
    async fn remove(&self, attachment: &FileAttachment) -> Result<(), FileStoreError>;
}

/// Fixture store that pretends every file landed on local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFileStore;

#[async_trait]
impl FileStore for FixtureFileStore {
    async fn store(
        &self,
        upload: &FileUpload,
        category: FileCategory,
    ) -> Result<FileAttachment, FileStoreError> {
        let path = format!("{}/{}", category.as_str(), upload.file_name());
        FileAttachment::local(upload.file_name(), path)
            .map_err(|err| FileStoreError::rejected(err.to_string()))
    }

    async fn remove(&self, _attachment: &FileAttachment) -> Result<(), FileStoreError> {
        Ok(())
    }
}
