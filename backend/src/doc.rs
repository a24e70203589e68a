//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (auth, dashboard,
//!   documents, results, health)
//! - **Schemas**: Domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`UserSchema`]) plus the wire DTOs for each endpoint
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::{LoginRequest, LoginResponse, LogoutResponse};
use crate::inbound::http::dashboard::DashboardBody;
use crate::inbound::http::documents::{
    BulkDeleteRequest, BulkDeleteResponse, DocumentBody, DocumentResponse, FileAttachmentBody,
    FileUploadBody, UploadDocumentRequest,
};
use crate::inbound::http::results::{
    FilterResultsResponse, ResultBody, ResultResponse, UploadResultRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, UserSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Approval backend API",
        description = "HTTP interface for document and course-result approval workflows.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::profile,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::documents::upload_document,
        crate::inbound::http::documents::approve_document,
        crate::inbound::http::documents::reject_document,
        crate::inbound::http::documents::delete_document,
        crate::inbound::http::documents::bulk_delete_documents,
        crate::inbound::http::results::list_results,
        crate::inbound::http::results::filter_results,
        crate::inbound::http::results::upload_result,
        crate::inbound::http::results::approve_result,
        crate::inbound::http::results::reject_result,
        crate::inbound::http::results::delete_result,
        crate::inbound::http::results::bulk_delete_results,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        DashboardBody,
        FileUploadBody,
        FileAttachmentBody,
        DocumentBody,
        UploadDocumentRequest,
        DocumentResponse,
        BulkDeleteRequest,
        BulkDeleteResponse,
        ResultBody,
        UploadResultRequest,
        ResultResponse,
        FilterResultsResponse,
    )),
    tags(
        (name = "auth", description = "Session login, logout, and profile"),
        (name = "dashboard", description = "Role-scoped dashboard statistics"),
        (name = "documents", description = "Document upload and review workflow"),
        (name = "results", description = "Course result upload and review workflow"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying schema registration and endpoint references.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const USER_SCHEMA_NAME: &str = "crate.domain.User";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_user_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user_schema = schemas.get(USER_SCHEMA_NAME).expect("User schema");

        assert_object_schema_has_field(user_schema, "id");
        assert_object_schema_has_field(user_schema, "display_name");
    }

    #[test]
    fn openapi_document_lists_every_workflow_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/login",
            "/api/v1/auth/logout",
            "/api/v1/auth/profile",
            "/api/v1/dashboard",
            "/api/v1/documents",
            "/api/v1/documents/{id}/approve",
            "/api/v1/documents/{id}/reject",
            "/api/v1/documents/{id}",
            "/api/v1/documents/bulk-delete",
            "/api/v1/results",
            "/api/v1/results/filter",
            "/api/v1/results/{id}/approve",
            "/api/v1/results/{id}/reject",
            "/api/v1/results/{id}",
            "/api/v1/results/bulk-delete",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI document"
            );
        }
    }

    #[test]
    fn openapi_document_declares_the_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(
            components.security_schemes.contains_key("SessionCookie"),
            "session cookie security scheme should be registered"
        );
    }
}
