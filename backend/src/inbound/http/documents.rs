//! Document workflow HTTP handlers.
//!
//! ```text
//! GET    /api/v1/documents
//! POST   /api/v1/documents
//! PATCH  /api/v1/documents/{id}/approve
//! PATCH  /api/v1/documents/{id}/reject
//! DELETE /api/v1/documents/{id}
//! POST   /api/v1/documents/bulk-delete
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::BulkDeleteOutcome;
use crate::domain::record::{FileAttachment, FileUpload, RecordValidationError};
use crate::domain::{Document, DocumentUpload, DocumentValidationError, Error, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, decode_base64_content, parse_uuid, parse_uuid_list};

/// File payload submitted inside an upload request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadBody {
    /// Original file name; must not contain path separators.
    pub name: String,
    /// Base64-encoded file content.
    pub content_base64: String,
    /// Declared MIME type.
    pub mime_type: Option<String>,
}

/// Stored file reference returned with every record.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachmentBody {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_view_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_download_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl From<&FileAttachment> for FileAttachmentBody {
    fn from(value: &FileAttachment) -> Self {
        Self {
            file_name: value.file_name().to_owned(),
            drive_file_id: value.drive_file_id().map(str::to_owned),
            drive_view_link: value.drive_view_link().map(str::to_owned),
            drive_download_link: value.drive_download_link().map(str::to_owned),
            local_path: value.local_path().map(str::to_owned),
        }
    }
}

/// Document record as serialised on the wire.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub file: FileAttachmentBody,
    /// `PENDING`, `APPROVED`, or `REJECTED`.
    pub status: String,
    #[schema(value_type = Object)]
    pub uploaded_by: UserSummary,
    #[schema(format = "date-time")]
    pub uploaded_at: String,
}

impl From<&Document> for DocumentBody {
    fn from(value: &Document) -> Self {
        Self {
            id: value.id().to_string(),
            title: value.title().as_str().to_owned(),
            description: value.description().to_owned(),
            file: value.file().into(),
            status: value.status().as_str().to_owned(),
            uploaded_by: value.uploaded_by().clone(),
            uploaded_at: value.uploaded_at().to_rfc3339(),
        }
    }
}

/// Request payload for `POST /api/v1/documents`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    pub title: String,
    pub description: Option<String>,
    /// Folded into the description as a `Category: <value>` prefix line.
    pub category: Option<String>,
    pub file: FileUploadBody,
}

/// Response payload for a successful upload or review decision.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub message: String,
    pub document: DocumentBody,
}

/// Request payload for `POST /api/v1/documents/bulk-delete`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub ids: Vec<String>,
}

/// Response payload for a bulk delete.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted_count: usize,
    pub errors: Option<Vec<String>>,
}

pub(crate) fn bulk_delete_response(outcome: BulkDeleteOutcome, noun: &str) -> BulkDeleteResponse {
    BulkDeleteResponse {
        message: format!("Successfully deleted {} {noun}(s)", outcome.deleted),
        deleted_count: outcome.deleted,
        errors: (!outcome.errors.is_empty()).then_some(outcome.errors),
    }
}

pub(crate) fn map_file_validation_error(err: RecordValidationError) -> Error {
    let field = match err {
        RecordValidationError::EmptyFileName | RecordValidationError::InvalidFileName => {
            "file.name"
        }
        _ => "file.contentBase64",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_file" }))
}

fn map_document_validation_error(err: DocumentValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "title", "code": "invalid_title" }))
}

pub(crate) fn decode_file_upload(
    file: FileUploadBody,
    max_upload_bytes: usize,
) -> Result<FileUpload, Error> {
    let content = decode_base64_content(
        &file.content_base64,
        FieldName::new("file.contentBase64"),
        max_upload_bytes,
    )?;
    FileUpload::try_from_parts(file.name, content, file.mime_type)
        .map_err(map_file_validation_error)
}

/// List the documents visible to the caller.
///
/// Staff see their own uploads; a head of department sees every document.
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    responses(
        (status = 200, description = "Documents visible to the caller", body = [DocumentBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "listDocuments",
    security(("SessionCookie" = []))
)]
#[get("/documents")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DocumentBody>>> {
    let actor = session.require_user_id()?;
    let documents = state.documents.list(&actor).await?;
    Ok(web::Json(documents.iter().map(DocumentBody::from).collect()))
}

/// Upload a new document.
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Account disabled", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "uploadDocument",
    security(("SessionCookie" = []))
)]
#[post("/documents")]
pub async fn upload_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let UploadDocumentRequest {
        title,
        description,
        category,
        file,
    } = payload.into_inner();
    let file = decode_file_upload(file, state.max_upload_bytes)?;
    let upload = DocumentUpload::try_from_parts(
        title,
        description.unwrap_or_default(),
        category.as_deref(),
        file,
    )
    .map_err(map_document_validation_error)?;

    let document = state.documents.upload(&actor, upload).await?;
    Ok(HttpResponse::Created().json(DocumentResponse {
        message: "Document uploaded successfully".to_owned(),
        document: DocumentBody::from(&document),
    }))
}

/// Approve a pending document.
#[utoipa::path(
    patch,
    path = "/api/v1/documents/{id}/approve",
    params(("id" = uuid::Uuid, Path, description = "Document identifier")),
    responses(
        (status = 200, description = "Document approved", body = DocumentResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already rejected", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "approveDocument",
    security(("SessionCookie" = []))
)]
#[patch("/documents/{id}/approve")]
pub async fn approve_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentResponse>> {
    let actor = session.require_user_id()?;
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let document = state.documents.approve(&actor, id).await?;
    Ok(web::Json(DocumentResponse {
        message: "Document approved successfully".to_owned(),
        document: DocumentBody::from(&document),
    }))
}

/// Reject a pending document.
#[utoipa::path(
    patch,
    path = "/api/v1/documents/{id}/reject",
    params(("id" = uuid::Uuid, Path, description = "Document identifier")),
    responses(
        (status = 200, description = "Document rejected", body = DocumentResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already approved", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "rejectDocument",
    security(("SessionCookie" = []))
)]
#[patch("/documents/{id}/reject")]
pub async fn reject_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentResponse>> {
    let actor = session.require_user_id()?;
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let document = state.documents.reject(&actor, id).await?;
    Ok(web::Json(DocumentResponse {
        message: "Document rejected".to_owned(),
        document: DocumentBody::from(&document),
    }))
}

/// Delete a document the caller owns (or any document for a head of
/// department).
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    params(("id" = uuid::Uuid, Path, description = "Document identifier")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "deleteDocument",
    security(("SessionCookie" = []))
)]
#[delete("/documents/{id}")]
pub async fn delete_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    state.documents.delete(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a batch of documents, collecting per-item failures.
#[utoipa::path(
    post,
    path = "/api/v1/documents/bulk-delete",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Batch processed", body = BulkDeleteResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "bulkDeleteDocuments",
    security(("SessionCookie" = []))
)]
#[post("/documents/bulk-delete")]
pub async fn bulk_delete_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BulkDeleteRequest>,
) -> ApiResult<web::Json<BulkDeleteResponse>> {
    let actor = session.require_user_id()?;
    let ids = parse_uuid_list(payload.into_inner().ids, FieldName::new("ids"))?;
    let outcome = state.documents.delete_many(&actor, &ids).await?;
    Ok(web::Json(bulk_delete_response(outcome, "document")))
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
