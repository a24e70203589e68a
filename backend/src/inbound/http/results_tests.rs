//! Routing and serialisation coverage for the course result handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::ports::{
    BulkDeleteOutcome, FixtureDashboardQuery, FixtureDocumentWorkflow, FixtureLoginService,
    FixtureUserProfileQuery, MockResultWorkflow,
};
use crate::domain::record::{FileAttachment, ReviewStatus};
use crate::domain::{
    AcademicSession, CourseCode, CourseResult, CourseResultDraft, CourseTitle, DisplayName,
    EmailAddress, Error, Semester, SessionName, UserId, UserSummary,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::test_utils::test_session_middleware;

fn ports_with_results(results: MockResultWorkflow) -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        profile: Arc::new(FixtureUserProfileQuery),
        dashboard: Arc::new(FixtureDashboardQuery),
        documents: Arc::new(FixtureDocumentWorkflow),
        results: Arc::new(results),
    }
}

fn results_app(
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
        .service(super::super::auth::login)
        .service(super::list_results)
        .service(super::filter_results)
        .service(super::upload_result)
        .service(super::approve_result)
        .service(super::reject_result)
        .service(super::delete_result)
        .service(super::bulk_delete_results)
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
            .set_json(json!({ "email": "staff@demo.local", "password": "demo123" }))
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

fn sample_result(course_code: &str) -> CourseResult {
    let uploader = UserSummary::new(
        UserId::random(),
        DisplayName::new("demo_staff").expect("display name"),
        EmailAddress::new("staff@demo.local").expect("email"),
    );
    let now = Utc::now();
    CourseResult::new(CourseResultDraft {
        id: Uuid::new_v4(),
        course_code: CourseCode::new(course_code).expect("course code"),
        course_title: Some(CourseTitle::new("Intro to Computing").expect("course title")),
        session: AcademicSession::new(
            Uuid::new_v4(),
            SessionName::new("2023/2024").expect("session name"),
        ),
        semester: Semester::First,
        file: FileAttachment::local("results.pdf", "results/results.pdf").expect("attachment"),
        status: ReviewStatus::Pending,
        uploaded_by: uploader,
        uploaded_at: now,
        updated_at: now,
    })
}

fn upload_body(course_code: &str) -> Value {
    json!({
        "courseCode": course_code,
        "courseTitle": "Intro to Computing",
        "session": "2023/2024",
        "semester": "first",
        "file": {
            "name": "results.pdf",
            "contentBase64": BASE64.encode(b"%PDF-1.4"),
            "mimeType": "application/pdf"
        }
    })
}

#[actix_web::test]
async fn list_requires_an_authenticated_session() {
    let state = web::Data::new(HttpState::new(ports_with_results(MockResultWorkflow::new())));
    let app = test::init_service(results_app(state)).await;

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/results").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_serialises_visible_results() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_list()
        .returning(|_| Ok(vec![sample_result("CSC101")]));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/results")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let listed = body.as_array().expect("array response");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["courseCode"], "CSC101");
    assert_eq!(listed[0]["courseTitle"], "Intro to Computing");
    assert_eq!(listed[0]["session"], "2023/2024");
    assert_eq!(listed[0]["semester"], "First");
    assert_eq!(listed[0]["status"], "PENDING");
    assert!(listed[0]["updatedAt"].is_string());
}

#[actix_web::test]
async fn filter_passes_normalised_criteria_to_the_workflow() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_filter()
        .withf(|_, criteria| {
            criteria.course_code() == Some("CSC")
                && criteria.session() == Some("2023")
                && criteria.semester() == Some(Semester::Second)
        })
        .returning(|_, _| Ok(vec![sample_result("CSC101")]));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/results/filter?courseCode=CSC&session=2023&semester=SECOND")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["courseCode"], "CSC101");
}

#[actix_web::test]
async fn filter_without_criteria_matches_everything() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_filter()
        .withf(|_, criteria| criteria.is_empty())
        .returning(|_, _| Ok(Vec::new()));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/results/filter")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["count"], 0);
    assert!(body["results"].as_array().expect("array").is_empty());
}

#[actix_web::test]
async fn filter_rejects_an_unknown_semester() {
    let state = web::Data::new(HttpState::new(ports_with_results(MockResultWorkflow::new())));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/results/filter?semester=summer")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "semester");
}

#[actix_web::test]
async fn upload_creates_a_result() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_upload()
        .withf(|_, upload| {
            upload.course_code().as_str() == "CSC101"
                && upload.session_name().as_str() == "2023/2024"
                && upload.semester() == Semester::First
        })
        .returning(|_, upload| Ok(sample_result(upload.course_code().as_str())));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/results")
            .cookie(cookie)
            .set_json(upload_body("CSC101"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Result uploaded successfully");
    assert_eq!(body["result"]["courseCode"], "CSC101");
}

#[actix_web::test]
async fn upload_accepts_and_discards_a_level_field() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_upload()
        .returning(|_, upload| Ok(sample_result(upload.course_code().as_str())));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let mut payload = upload_body("CSC101");
    payload["level"] = json!("400");
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/results")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn upload_surfaces_a_duplicate_conflict() {
    let mut results = MockResultWorkflow::new();
    results.expect_upload().returning(|_, _| {
        Err(Error::conflict(
            "a result for CSC101 in 2023/2024 First semester already exists",
        ))
    });
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/results")
            .cookie(cookie)
            .set_json(upload_body("CSC101"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "conflict");
}

#[actix_web::test]
async fn upload_rejects_an_unknown_semester() {
    let state = web::Data::new(HttpState::new(ports_with_results(MockResultWorkflow::new())));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let mut payload = upload_body("CSC101");
    payload["semester"] = json!("summer");
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/results")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "semester");
}

#[actix_web::test]
async fn approve_returns_the_updated_result() {
    let id = Uuid::new_v4();
    let mut results = MockResultWorkflow::new();
    results
        .expect_approve()
        .withf(move |_, result_id| *result_id == id)
        .returning(|_, _| Ok(sample_result("CSC101")));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/results/{id}/approve"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Result approved successfully");
}

#[actix_web::test]
async fn reject_reports_the_decision() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_reject()
        .returning(|_, _| Ok(sample_result("CSC101")));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/results/{}/reject", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Result rejected");
}

#[actix_web::test]
async fn approve_surfaces_a_review_conflict() {
    let mut results = MockResultWorkflow::new();
    results
        .expect_approve()
        .returning(|_, _| Err(Error::conflict("result is already REJECTED")));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/results/{}/approve", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut results = MockResultWorkflow::new();
    results.expect_delete().returning(|_, _| Ok(()));
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/results/{}", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn bulk_delete_reports_partial_failure() {
    let mut results = MockResultWorkflow::new();
    results.expect_delete_many().returning(|_, _| {
        Ok(BulkDeleteOutcome {
            deleted: 2,
            errors: vec!["Failed to delete CSC999: result not found".to_owned()],
        })
    });
    let state = web::Data::new(HttpState::new(ports_with_results(results)));
    let app = test::init_service(results_app(state)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/results/bulk-delete")
            .cookie(cookie)
            .set_json(json!({ "ids": [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()] }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Successfully deleted 2 result(s)");
    assert_eq!(body["deletedCount"], 2);
    assert_eq!(
        body["errors"].as_array().expect("errors listed").len(),
        1
    );
}
