//! Handler coverage for account administration.

use super::*;
use crate::domain::test_fixtures::user;
use crate::domain::{ErrorCode, RecordStatus, SearchTerm};
use crate::inbound::http::test_utils::{TestPorts, bearer_token};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    ports: TestPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(ports.into_state())).service(
        web::scope("/api/v1")
            .service(list_users)
            .service(create_user)
            .service(get_user)
            .service(update_user)
            .service(deactivate_user)
            .service(reactivate_user),
    )
}

fn as_role(request: actix_test::TestRequest, role: Role) -> actix_test::TestRequest {
    request.insert_header((AUTHORIZATION, format!("Bearer {}", bearer_token(role))))
}

#[actix_web::test]
async fn list_forwards_search_and_page() {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_list()
        .withf(|search, page| {
            search.as_ref().map(SearchTerm::as_str) == Some("Ana")
                && page.page() == 2
                && page.limit() == 5
        })
        .times(1)
        .return_once(|search, page| {
            let rows = vec![user("ana@hospital.com", Role::Tecnico, RecordStatus::Activo)];
            Ok(Page::new(rows, 6, page).with_search(search.map(|s| s.as_str().to_owned())))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        as_role(
            actix_test::TestRequest::get().uri("/api/v1/users?page=2&limit=5&search=Ana"),
            Role::Admin,
        )
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["total"], 6);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["search"], "Ana");
    assert_eq!(body["data"][0]["email"], "ana@hospital.com");
    assert!(body["data"][0].get("passwordHash").is_none());
}

#[rstest]
#[case::list("/api/v1/users", actix_test::TestRequest::get())]
#[case::reactivate(
    "/api/v1/users/22222222-2222-4222-8222-222222222222/reactivate",
    actix_test::TestRequest::post()
)]
#[case::deactivate(
    "/api/v1/users/22222222-2222-4222-8222-222222222222",
    actix_test::TestRequest::delete()
)]
#[actix_web::test]
async fn technicians_cannot_administer_accounts(
    #[case] uri: &str,
    #[case] request: actix_test::TestRequest,
) {
    let app = actix_test::init_service(test_app(TestPorts::default())).await;
    let res =
        actix_test::call_service(&app, as_role(request.uri(uri), Role::Tecnico).to_request())
            .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::Forbidden);
}

#[actix_web::test]
async fn anonymous_callers_are_unauthenticated() {
    let app = actix_test::init_service(test_app(TestPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_defaults_role_to_technician() {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_create()
        .withf(|new_user| {
            new_user.role == Role::Tecnico && new_user.email.as_ref() == "luis@hospital.com"
        })
        .times(1)
        .return_once(|new_user| {
            Ok(user(
                new_user.email.as_ref(),
                new_user.role,
                RecordStatus::Activo,
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        as_role(actix_test::TestRequest::post().uri("/api/v1/users"), Role::Admin)
            .set_json(json!({
                "email": "Luis@Hospital.com",
                "displayName": "Luis Pérez",
                "password": "secreta"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: User = actix_test::read_body_json(res).await;
    assert_eq!(body.role, Role::Tecnico);
    assert_eq!(body.status, RecordStatus::Activo);
}

#[rstest]
#[case(json!({"email": "no-at-sign", "displayName": "Luis", "password": "secreta"}), "email")]
#[case(json!({"email": "l@h.com", "displayName": "  ", "password": "secreta"}), "displayName")]
#[case(json!({"email": "l@h.com", "displayName": "Luis", "password": "12345"}), "password")]
#[case(json!({"email": "l@h.com", "displayName": "Luis", "password": "secreta", "role": "JEFE"}), "role")]
#[actix_web::test]
async fn create_rejects_invalid_fields(#[case] payload: Value, #[case] field: &str) {
    let app = actix_test::init_service(test_app(TestPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        as_role(actix_test::TestRequest::post().uri("/api/v1/users"), Role::Admin)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(
        body.details().and_then(|d| d.get("field")),
        Some(&json!(field))
    );
}

#[actix_web::test]
async fn duplicate_email_is_conflict() {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_create()
        .return_once(|_| Err(Error::conflict("email already registered")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        as_role(actix_test::TestRequest::post().uri("/api/v1/users"), Role::Admin)
            .set_json(json!({
                "email": "admin@hospital.com",
                "displayName": "Otra",
                "password": "secreta",
                "role": "ADMIN"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn update_passes_only_present_fields() {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_update()
        .withf(|_, changes| {
            changes.role == Some(Role::Admin)
                && changes.email.is_none()
                && changes.display_name.is_none()
                && changes.password.is_some()
        })
        .times(1)
        .return_once(|_, _| Ok(user("luis@hospital.com", Role::Admin, RecordStatus::Activo)));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        as_role(
            actix_test::TestRequest::put()
                .uri("/api/v1/users/22222222-2222-4222-8222-222222222222"),
            Role::Admin,
        )
        .set_json(json!({ "role": "ADMIN", "password": "nueva-clave" }))
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn malformed_id_is_rejected_before_lookup() {
    let app = actix_test::init_service(test_app(TestPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        as_role(
            actix_test::TestRequest::get().uri("/api/v1/users/not-a-uuid"),
            Role::Admin,
        )
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(
        body.details().and_then(|d| d.get("code")),
        Some(&json!("invalid_uuid"))
    );
}

#[actix_web::test]
async fn deactivate_returns_inactive_account() {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_deactivate()
        .times(1)
        .return_once(|_| Ok(user("luis@hospital.com", Role::Tecnico, RecordStatus::Inactivo)));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        as_role(
            actix_test::TestRequest::delete()
                .uri("/api/v1/users/22222222-2222-4222-8222-222222222222"),
            Role::Admin,
        )
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: User = actix_test::read_body_json(res).await;
    assert_eq!(body.status, RecordStatus::Inactivo);
}

#[actix_web::test]
async fn reactivating_unknown_account_is_not_found() {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_reactivate()
        .return_once(|_| Err(Error::not_found("user not found")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        as_role(
            actix_test::TestRequest::post()
                .uri("/api/v1/users/33333333-3333-4333-8333-333333333333/reactivate"),
            Role::Admin,
        )
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
