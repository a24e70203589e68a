//! Reqwest-backed cloud drive file store.
//!
//! This adapter owns transport details only: JSON request framing with
//! base64 file content, timeout and HTTP error mapping, and decoding the
//! drive's upload receipt into a domain attachment.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{FileCategory, FileStore, FileStoreError};
use crate::domain::record::{FileAttachment, FileUpload};

/// Drive store adapter performing HTTP requests against one endpoint.
pub struct DriveFileStore {
    client: Client,
    endpoint: Url,
}

impl DriveFileStore {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    fn files_url(&self) -> Result<Url, FileStoreError> {
        self.endpoint
            .join("files")
            .map_err(|err| FileStoreError::rejected(format!("invalid drive endpoint: {err}")))
    }

    fn file_url(&self, file_id: &str) -> Result<Url, FileStoreError> {
        self.endpoint
            .join(&format!("files/{file_id}"))
            .map_err(|err| FileStoreError::rejected(format!("invalid drive endpoint: {err}")))
    }
}

/// Upload request framing sent to the drive endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequestDto<'a> {
    file_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    folder: &'a str,
    content_base64: String,
}

/// Upload receipt returned by the drive endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFileDto {
    id: String,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    web_content_link: Option<String>,
}

fn build_upload_request<'a>(upload: &'a FileUpload, category: FileCategory) -> UploadRequestDto<'a> {
    UploadRequestDto {
        file_name: upload.file_name(),
        mime_type: upload.mime_type(),
        folder: category.as_str(),
        content_base64: BASE64.encode(upload.content()),
    }
}

fn parse_stored_file(body: &[u8], file_name: &str) -> Result<FileAttachment, FileStoreError> {
    let receipt: StoredFileDto = serde_json::from_slice(body)
        .map_err(|err| FileStoreError::rejected(format!("invalid drive receipt: {err}")))?;
    FileAttachment::remote(
        file_name,
        receipt.id,
        receipt.web_view_link,
        receipt.web_content_link,
    )
    .map_err(|err| FileStoreError::rejected(format!("invalid drive receipt: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> FileStoreError {
    FileStoreError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FileStoreError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    if status.is_client_error() {
        FileStoreError::rejected(message)
    } else {
        FileStoreError::transport(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl FileStore for DriveFileStore {
    async fn store(
        &self,
        upload: &FileUpload,
        category: FileCategory,
    ) -> Result<FileAttachment, FileStoreError> {
        let url = self.files_url()?;
        let request = build_upload_request(upload, category);
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_stored_file(body.as_ref(), upload.file_name())
    }

    async fn remove(&self, attachment: &FileAttachment) -> Result<(), FileStoreError> {
        let Some(file_id) = attachment.drive_file_id() else {
            return Err(FileStoreError::rejected(
                "attachment is not stored in the drive",
            ));
        };

        let url = self.file_url(file_id)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        // A file that is already gone leaves nothing to clean up.
        if status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(())
    }
}
