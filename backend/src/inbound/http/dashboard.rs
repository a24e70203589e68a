//! Dashboard statistics handler.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::User;
use crate::domain::ports::DashboardSummary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Role-scoped dashboard statistics as serialised on the wire.
///
/// The pending breakdown fields are present for a head of department and
/// omitted for staff.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBody {
    #[schema(value_type = UserSchema)]
    pub user: User,
    pub total_documents: i64,
    pub total_results: i64,
    pub recent_uploads: i64,
    pub pending_approvals: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_documents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_results: Option<i64>,
}

impl From<DashboardSummary> for DashboardBody {
    fn from(value: DashboardSummary) -> Self {
        let DashboardSummary {
            user,
            total_documents,
            total_results,
            recent_uploads,
            pending_approvals,
            pending_documents,
            pending_results,
        } = value;
        Self {
            user,
            total_documents,
            total_results,
            recent_uploads,
            pending_approvals,
            pending_documents,
            pending_results,
        }
    }
}

/// Return the caller's dashboard statistics.
///
/// Staff totals cover only the caller's own uploads; the head of department
/// sees store-wide totals plus the pending breakdown.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Caller dashboard", body = DashboardBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "dashboard",
    security(("SessionCookie" = []))
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardBody>> {
    let actor = session.require_user_id()?;
    let summary = state.dashboard.summarize(&actor).await?;
    Ok(web::Json(DashboardBody::from(summary)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::domain::ports::{
        DashboardSummary, FixtureDocumentWorkflow, FixtureLoginService, FixtureResultWorkflow,
        FixtureUserProfileQuery, MockDashboardQuery,
    };
    use crate::domain::{DepartmentName, DisplayName, EmailAddress, Role, User, UserId};
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::inbound::http::test_utils::test_session_middleware;

    fn ports_with_dashboard(dashboard: MockDashboardQuery) -> HttpStatePorts {
        HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            profile: Arc::new(FixtureUserProfileQuery),
            dashboard: Arc::new(dashboard),
            documents: Arc::new(FixtureDocumentWorkflow),
            results: Arc::new(FixtureResultWorkflow),
        }
    }

    fn dashboard_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .service(crate::inbound::http::auth::login)
            .service(super::dashboard)
    }

    async fn login_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> Cookie<'static> {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "hod@demo.local", "password": "demo123" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    fn hod_user(actor: &UserId) -> User {
        User::new(
            actor.clone(),
            DisplayName::new("demo_hod").expect("display name"),
            EmailAddress::new("hod@demo.local").expect("email"),
            Role::Hod,
            Some(DepartmentName::new("Computer Science").expect("department")),
            true,
        )
    }

    #[actix_web::test]
    async fn dashboard_requires_an_authenticated_session() {
        let state = web::Data::new(HttpState::new(ports_with_dashboard(
            MockDashboardQuery::new(),
        )));
        let app = test::init_service(dashboard_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/dashboard").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn dashboard_includes_the_pending_breakdown_for_a_head_of_department() {
        let mut dashboard = MockDashboardQuery::new();
        dashboard.expect_summarize().returning(|actor| {
            Ok(DashboardSummary {
                user: hod_user(actor),
                total_documents: 12,
                total_results: 7,
                recent_uploads: 3,
                pending_approvals: 5,
                pending_documents: Some(2),
                pending_results: Some(3),
            })
        });
        let state = web::Data::new(HttpState::new(ports_with_dashboard(dashboard)));
        let app = test::init_service(dashboard_app(state)).await;
        let cookie = login_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"]["role"], "HOD");
        assert_eq!(body["totalDocuments"], 12);
        assert_eq!(body["pendingApprovals"], 5);
        assert_eq!(body["pendingDocuments"], 2);
        assert_eq!(body["pendingResults"], 3);
    }

    #[actix_web::test]
    async fn dashboard_omits_the_pending_breakdown_for_staff() {
        let mut dashboard = MockDashboardQuery::new();
        dashboard.expect_summarize().returning(|actor| {
            let user = User::new(
                actor.clone(),
                DisplayName::new("demo_staff").expect("display name"),
                EmailAddress::new("staff@demo.local").expect("email"),
                Role::Staff,
                None,
                true,
            );
            Ok(DashboardSummary {
                user,
                total_documents: 4,
                total_results: 2,
                recent_uploads: 1,
                pending_approvals: 2,
                pending_documents: None,
                pending_results: None,
            })
        });
        let state = web::Data::new(HttpState::new(ports_with_dashboard(dashboard)));
        let app = test::init_service(dashboard_app(state)).await;
        let cookie = login_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["totalDocuments"], 4);
        assert!(body.get("pendingDocuments").is_none());
        assert!(body.get("pendingResults").is_none());
    }
}
