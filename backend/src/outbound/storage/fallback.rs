//! Composite file store degrading from the drive to local disk.
//!
//! Uploads try the drive first; any drive failure is logged and the bytes
//! land in local storage instead, so an unreachable drive never blocks a
//! record upload. Removals dispatch to whichever backend holds the file.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{FileCategory, FileStore, FileStoreError};
use crate::domain::record::{FileAttachment, FileUpload};

/// File store that prefers the drive and falls back to local disk.
#[derive(Clone)]
pub struct FallbackFileStore {
    drive: Option<Arc<dyn FileStore>>,
    local: Arc<dyn FileStore>,
}

impl FallbackFileStore {
    /// Compose a drive store with its local fallback.
    pub fn new(drive: Arc<dyn FileStore>, local: Arc<dyn FileStore>) -> Self {
        Self {
            drive: Some(drive),
            local,
        }
    }

    /// Compose a store without a drive; every upload lands on local disk.
    pub fn local_only(local: Arc<dyn FileStore>) -> Self {
        Self { drive: None, local }
    }
}

#[async_trait]
impl FileStore for FallbackFileStore {
    async fn store(
        &self,
        upload: &FileUpload,
        category: FileCategory,
    ) -> Result<FileAttachment, FileStoreError> {
        let Some(drive) = &self.drive else {
            return self.local.store(upload, category).await;
        };
        match drive.store(upload, category).await {
            Ok(attachment) => Ok(attachment),
            Err(error) => {
                warn!(
                    file_name = upload.file_name(),
                    %error,
                    "drive store failed, falling back to local storage"
                );
                self.local.store(upload, category).await
            }
        }
    }

    async fn remove(&self, attachment: &FileAttachment) -> Result<(), FileStoreError> {
        if attachment.drive_file_id().is_some() {
            let Some(drive) = &self.drive else {
                return Err(FileStoreError::rejected(
                    "no drive configured for this attachment",
                ));
            };
            drive.remove(attachment).await
        } else {
            self.local.remove(attachment).await
        }
    }
}
