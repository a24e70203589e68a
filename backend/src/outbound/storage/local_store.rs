//! Sandboxed local-disk file store.
//!
//! Files land under an upload root opened through `cap-std`, so every path
//! the adapter touches stays inside that directory. Stored names carry a
//! UUID prefix so repeated uploads of the same file name never collide.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::ports::{FileCategory, FileStore, FileStoreError};
use crate::domain::record::{FileAttachment, FileUpload};

/// File store writing uploads beneath a sandboxed root directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Open (creating if needed) the upload root.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(map_io_error)?;
        Ok(Self { root })
    }

    fn open_root(root: &PathBuf) -> Result<Dir, FileStoreError> {
        Dir::open_ambient_dir(root, ambient_authority()).map_err(map_io_error)
    }
}

fn map_io_error(error: io::Error) -> FileStoreError {
    FileStoreError::io(error.to_string())
}

/// Run a blocking filesystem closure off the async executor.
async fn run_blocking<T, F>(task: F) -> Result<T, FileStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FileStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| FileStoreError::io(format!("storage task failed: {err}")))?
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(
        &self,
        upload: &FileUpload,
        category: FileCategory,
    ) -> Result<FileAttachment, FileStoreError> {
        let file_name = upload.file_name().to_owned();
        let stored_name = format!("{}_{file_name}", Uuid::new_v4().simple());
        let relative = format!("{}/{stored_name}", category.as_str());

        let root = self.root.clone();
        let content = upload.content().to_vec();
        let target = relative.clone();
        run_blocking(move || {
            let dir = Self::open_root(&root)?;
            match dir.create_dir(category.as_str()) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
                Err(err) => return Err(map_io_error(err)),
            }
            dir.write(&target, &content).map_err(map_io_error)
        })
        .await?;

        FileAttachment::local(file_name, relative)
            .map_err(|err| FileStoreError::rejected(err.to_string()))
    }

    async fn remove(&self, attachment: &FileAttachment) -> Result<(), FileStoreError> {
        let Some(path) = attachment.local_path() else {
            return Err(FileStoreError::rejected(
                "attachment is not stored locally",
            ));
        };

        let root = self.root.clone();
        let path = path.to_owned();
        run_blocking(move || {
            let dir = Self::open_root(&root)?;
            match dir.remove_file(&path) {
                Ok(()) => Ok(()),
                // A file that is already gone leaves nothing to clean up.
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(map_io_error(err)),
            }
        })
        .await
    }
}
