//! Login, session verification, and account deactivation end to end.

mod support;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use bitacora::domain::ports::TokenCodec;
use bitacora::domain::{DisplayName, Error, ErrorCode, Identity, Role, UserId};
use bitacora::inbound::http::session::ACCESS_TOKEN_COOKIE;
use bitacora::outbound::security::JwtTokenCodec;
use chrono::{TimeDelta, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use support::{
    ADMIN_EMAIL, ADMIN_PASSWORD, Harness, Storage, TOKEN_SECRET, authed, create_user, login,
    login_admin, send, text,
};

fn error_code(body: Value) -> ErrorCode {
    serde_json::from_value::<Error>(body)
        .expect("error envelope")
        .code()
}

#[actix_web::test]
async fn seeded_admin_logs_in_and_reads_its_identity() {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body.get("token").is_none(), "token only travels in the cookie");

    let token = login_admin(&app).await;
    let (status, me) = send(&app, authed(TestRequest::get().uri("/api/v1/auth/me"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["displayName"], "Administrador");
    assert_eq!(me["role"], "ADMIN");
}

#[actix_web::test]
async fn session_cookie_authenticates_without_a_header() {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;
    let token = login_admin(&app).await;

    let req = TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[case(ADMIN_EMAIL, "incorrecta")]
#[case("nadie@hospital.com", ADMIN_PASSWORD)]
#[actix_web::test]
async fn bad_credentials_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(body), ErrorCode::InvalidCredentials);
}

#[actix_web::test]
async fn deactivated_accounts_cannot_log_in_until_reactivated() {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;
    let admin = login_admin(&app).await;
    let user = create_user(&app, &admin, "luis@hospital.com", "TECNICO").await;
    let user_id = text(&user, "id");

    let (status, deactivated) = send(
        &app,
        authed(TestRequest::delete().uri(&format!("/api/v1/users/{user_id}")), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deactivated["status"], "INACTIVO");

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "luis@hospital.com", "password": "clave123" }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(body), ErrorCode::AccountDisabled);

    let (status, _) = send(
        &app,
        authed(
            TestRequest::post().uri(&format!("/api/v1/users/{user_id}/reactivate")),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login(&app, "luis@hospital.com", "clave123").await;
}

#[actix_web::test]
async fn expired_tokens_are_rejected() {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;

    let identity = Identity {
        user_id: UserId::random(),
        display_name: DisplayName::new("Ana Torres").expect("name"),
        role: Role::Admin,
    };
    let issued_at = Utc::now() - TimeDelta::hours(10);
    let token = JwtTokenCodec::new(TOKEN_SECRET)
        .issue(&identity, issued_at, issued_at + TimeDelta::hours(8))
        .expect("issue token");

    let (status, body) = send(
        &app,
        authed(TestRequest::get().uri("/api/v1/equipment"), token.as_str()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(body), ErrorCode::InvalidToken);
}

#[rstest]
#[case("/api/v1/equipment")]
#[case("/api/v1/stats")]
#[case("/api/v1/users")]
#[actix_web::test]
async fn protected_reads_require_a_session(#[case] uri: &str) {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;

    let (status, body) = send(&app, TestRequest::get().uri(uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(body), ErrorCode::Unauthenticated);
}

#[actix_web::test]
async fn logout_expires_both_cookies() {
    let harness = Harness::new(Storage::Memory).await;
    let app = harness.app().await;
    let token = login_admin(&app).await;

    let req = authed(TestRequest::post().uri("/api/v1/auth/logout"), &token).to_request();
    let res = actix_web::test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared: Vec<_> = res
        .response()
        .cookies()
        .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned()))
        .collect();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|(_, value)| value.is_empty()));
}
