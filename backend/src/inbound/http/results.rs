//! Course result workflow HTTP handlers.
//!
//! ```text
//! GET    /api/v1/results
//! GET    /api/v1/results/filter?courseCode=&session=&semester=
//! POST   /api/v1/results
//! PATCH  /api/v1/results/{id}/approve
//! PATCH  /api/v1/results/{id}/reject
//! DELETE /api/v1/results/{id}
//! POST   /api/v1/results/bulk-delete
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CourseResult, Error, ResultFilter, ResultUpload, ResultValidationError, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::documents::{
    BulkDeleteRequest, BulkDeleteResponse, FileAttachmentBody, FileUploadBody,
    bulk_delete_response, decode_file_upload,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, parse_uuid_list};

/// Course result record as serialised on the wire.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub course_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    /// Academic session name, e.g. `2023/2024`.
    pub session: String,
    /// `First` or `Second`.
    pub semester: String,
    pub file: FileAttachmentBody,
    /// `PENDING`, `APPROVED`, or `REJECTED`.
    pub status: String,
    #[schema(value_type = Object)]
    pub uploaded_by: UserSummary,
    #[schema(format = "date-time")]
    pub uploaded_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<&CourseResult> for ResultBody {
    fn from(value: &CourseResult) -> Self {
        Self {
            id: value.id().to_string(),
            course_code: value.course_code().as_str().to_owned(),
            course_title: value.course_title().map(|title| title.as_str().to_owned()),
            session: value.session().name().as_str().to_owned(),
            semester: value.semester().as_str().to_owned(),
            file: value.file().into(),
            status: value.status().as_str().to_owned(),
            uploaded_by: value.uploaded_by().clone(),
            uploaded_at: value.uploaded_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// Request payload for `POST /api/v1/results`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResultRequest {
    pub course_code: String,
    pub course_title: Option<String>,
    /// Academic session name; created on first use.
    pub session: String,
    /// `first` or `second`, case-insensitive.
    pub semester: String,
    /// Accepted for compatibility and discarded.
    pub level: Option<String>,
    pub file: FileUploadBody,
}

/// Response payload for a successful upload or review decision.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub message: String,
    pub result: ResultBody,
}

/// Filtered listing response with its count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterResultsResponse {
    pub results: Vec<ResultBody>,
    pub count: usize,
}

/// Query parameters for `GET /api/v1/results/filter`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FilterResultsQuery {
    /// Course code fragment to match.
    pub course_code: Option<String>,
    /// Session name fragment to match.
    pub session: Option<String>,
    /// Semester to match exactly, case-insensitive.
    pub semester: Option<String>,
}

fn map_result_validation_error(err: ResultValidationError) -> Error {
    let field = match err {
        ResultValidationError::EmptyCourseCode
        | ResultValidationError::CourseCodeTooLong { .. } => "courseCode",
        ResultValidationError::CourseTitleTooLong { .. } => "courseTitle",
        ResultValidationError::EmptySessionName
        | ResultValidationError::SessionNameTooLong { .. } => "session",
        ResultValidationError::UnknownSemester { .. } => "semester",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_result" }))
}

/// List the results visible to the caller.
///
/// Staff see their own uploads; a head of department sees every result.
#[utoipa::path(
    get,
    path = "/api/v1/results",
    responses(
        (status = 200, description = "Results visible to the caller", body = [ResultBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "listResults",
    security(("SessionCookie" = []))
)]
#[get("/results")]
pub async fn list_results(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ResultBody>>> {
    let actor = session.require_user_id()?;
    let results = state.results.list(&actor).await?;
    Ok(web::Json(results.iter().map(ResultBody::from).collect()))
}

/// Filter the caller's visible results.
///
/// Course code and session match as substrings; semester matches exactly
/// after case normalisation. Criteria combine conjunctively.
#[utoipa::path(
    get,
    path = "/api/v1/results/filter",
    params(FilterResultsQuery),
    responses(
        (status = 200, description = "Matching results", body = FilterResultsResponse),
        (status = 400, description = "Invalid semester", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "filterResults",
    security(("SessionCookie" = []))
)]
#[get("/results/filter")]
pub async fn filter_results(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FilterResultsQuery>,
) -> ApiResult<web::Json<FilterResultsResponse>> {
    let actor = session.require_user_id()?;
    let FilterResultsQuery {
        course_code,
        session: session_name,
        semester,
    } = query.into_inner();
    let criteria = ResultFilter::from_parts(session_name, semester, course_code)
        .map_err(map_result_validation_error)?;
    let results = state.results.filter(&actor, criteria).await?;
    let results: Vec<ResultBody> = results.iter().map(ResultBody::from).collect();
    let count = results.len();
    Ok(web::Json(FilterResultsResponse { results, count }))
}

/// Upload a new course result.
///
/// The (course code, session, semester) triple must be unique; a duplicate
/// upload fails with `409 Conflict` and never overwrites.
#[utoipa::path(
    post,
    path = "/api/v1/results",
    request_body = UploadResultRequest,
    responses(
        (status = 201, description = "Result created", body = ResultResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Account disabled", body = ErrorSchema),
        (status = 409, description = "Duplicate result", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "uploadResult",
    security(("SessionCookie" = []))
)]
#[post("/results")]
pub async fn upload_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadResultRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let UploadResultRequest {
        course_code,
        course_title,
        session: session_name,
        semester,
        level: _,
        file,
    } = payload.into_inner();
    let file = decode_file_upload(file, state.max_upload_bytes)?;
    let upload = ResultUpload::try_from_parts(
        course_code,
        course_title.as_deref(),
        session_name,
        semester,
        file,
    )
    .map_err(map_result_validation_error)?;

    let result = state.results.upload(&actor, upload).await?;
    Ok(HttpResponse::Created().json(ResultResponse {
        message: "Result uploaded successfully".to_owned(),
        result: ResultBody::from(&result),
    }))
}

/// Approve a pending result.
#[utoipa::path(
    patch,
    path = "/api/v1/results/{id}/approve",
    params(("id" = uuid::Uuid, Path, description = "Result identifier")),
    responses(
        (status = 200, description = "Result approved", body = ResultResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already rejected", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "approveResult",
    security(("SessionCookie" = []))
)]
#[patch("/results/{id}/approve")]
pub async fn approve_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ResultResponse>> {
    let actor = session.require_user_id()?;
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let result = state.results.approve(&actor, id).await?;
    Ok(web::Json(ResultResponse {
        message: "Result approved successfully".to_owned(),
        result: ResultBody::from(&result),
    }))
}

/// Reject a pending result.
#[utoipa::path(
    patch,
    path = "/api/v1/results/{id}/reject",
    params(("id" = uuid::Uuid, Path, description = "Result identifier")),
    responses(
        (status = 200, description = "Result rejected", body = ResultResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already approved", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "rejectResult",
    security(("SessionCookie" = []))
)]
#[patch("/results/{id}/reject")]
pub async fn reject_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ResultResponse>> {
    let actor = session.require_user_id()?;
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let result = state.results.reject(&actor, id).await?;
    Ok(web::Json(ResultResponse {
        message: "Result rejected".to_owned(),
        result: ResultBody::from(&result),
    }))
}

/// Delete a result the caller owns (or any result for a head of department).
#[utoipa::path(
    delete,
    path = "/api/v1/results/{id}",
    params(("id" = uuid::Uuid, Path, description = "Result identifier")),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "deleteResult",
    security(("SessionCookie" = []))
)]
#[delete("/results/{id}")]
pub async fn delete_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    state.results.delete(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a batch of results, collecting per-item failures.
#[utoipa::path(
    post,
    path = "/api/v1/results/bulk-delete",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Batch processed", body = BulkDeleteResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["results"],
    operation_id = "bulkDeleteResults",
    security(("SessionCookie" = []))
)]
#[post("/results/bulk-delete")]
pub async fn bulk_delete_results(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BulkDeleteRequest>,
) -> ApiResult<web::Json<BulkDeleteResponse>> {
    let actor = session.require_user_id()?;
    let ids = parse_uuid_list(payload.into_inner().ids, FieldName::new("ids"))?;
    let outcome = state.results.delete_many(&actor, &ids).await?;
    Ok(web::Json(bulk_delete_response(outcome, "result")))
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
