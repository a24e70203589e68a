//! Routing and serialisation coverage for the authentication handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use crate::domain::ports::{
    FIXTURE_HOD_ID, FixtureDashboardQuery, FixtureDocumentWorkflow, FixtureLoginService,
    FixtureResultWorkflow, FixtureUserProfileQuery, MockLoginService,
};
use crate::domain::Error;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::test_utils::test_session_middleware;

fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        profile: Arc::new(FixtureUserProfileQuery),
        dashboard: Arc::new(FixtureDashboardQuery),
        documents: Arc::new(FixtureDocumentWorkflow),
        results: Arc::new(FixtureResultWorkflow),
    }
}

fn auth_app(
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
        .service(super::login)
        .service(super::logout)
        .service(super::profile)
}

fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

#[actix_web::test]
async fn login_success_sets_session_cookie_and_returns_user() {
    let state = web::Data::new(HttpState::new(fixture_ports()));
    let app = test::init_service(auth_app(state)).await;

    let res = test::call_service(&app, login_request("hod@demo.local", "demo123").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.response()
            .cookies()
            .any(|cookie| cookie.name() == "session"),
        "login should set a session cookie"
    );

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["id"], FIXTURE_HOD_ID);
    assert_eq!(body["user"]["email"], "hod@demo.local");
    assert_eq!(body["user"]["role"], "HOD");
    assert_eq!(body["user"]["approved"], true);
}

#[actix_web::test]
async fn login_rejects_blank_email_before_calling_the_service() {
    let mut login = MockLoginService::new();
    login.expect_authenticate().never();
    let state = web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        ..fixture_ports()
    }));
    let app = test::init_service(auth_app(state)).await;

    let res = test::call_service(&app, login_request("   ", "demo123").to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "empty_email");
}

#[actix_web::test]
async fn login_surfaces_unauthorized_from_the_service() {
    let mut login = MockLoginService::new();
    login
        .expect_authenticate()
        .returning(|_| Err(Error::unauthorized("invalid credentials")));
    let state = web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        ..fixture_ports()
    }));
    let app = test::init_service(auth_app(state)).await;

    let res = test::call_service(
        &app,
        login_request("intruder@demo.local", "wrong").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "invalid credentials");
}

#[actix_web::test]
async fn profile_requires_an_authenticated_session() {
    let state = web::Data::new(HttpState::new(fixture_ports()));
    let app = test::init_service(auth_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/auth/profile").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "login required");
}

#[actix_web::test]
async fn profile_returns_the_session_user() {
    let state = web::Data::new(HttpState::new(fixture_ports()));
    let app = test::init_service(auth_app(state)).await;

    let login_res =
        test::call_service(&app, login_request("hod@demo.local", "demo123").to_request()).await;
    let cookie = login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"], FIXTURE_HOD_ID);
}

#[actix_web::test]
async fn logout_purges_the_session() {
    let state = web::Data::new(HttpState::new(fixture_ports()));
    let app = test::init_service(auth_app(state)).await;

    let login_res =
        test::call_service(&app, login_request("hod@demo.local", "demo123").to_request()).await;
    let cookie = login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set");

    let logout_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::OK);
    let cleared = logout_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie issued")
        .into_owned();
    let body: Value = test::read_body_json(logout_res).await;
    assert_eq!(body["message"], "Logged out successfully");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/profile")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_without_a_session_still_succeeds() {
    let state = web::Data::new(HttpState::new(fixture_ports()));
    let app = test::init_service(auth_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/auth/logout").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
