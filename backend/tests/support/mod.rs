//! Shared harness for the HTTP integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls this module in with `mod support;` and uses the subset
//! it needs.

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use tempfile::TempDir;

use bitacora::Trace;
use bitacora::domain::ports::{FileStore, SignedFileReader};
use bitacora::domain::{
    BootstrapAdmin, CredentialService, DisplayName, Email, EquipmentService, MaintenanceService,
    NewPassword, SessionService, StatsService, UserAccountService,
};
use bitacora::inbound::http::session::{ACCESS_TOKEN_COOKIE, CookiePolicy};
use bitacora::inbound::http::state::{HttpState, HttpStatePorts};
use bitacora::inbound::http::{API_PREFIX, configure_api};
use bitacora::outbound::memory::{InMemoryDatabase, InMemoryFileStore, InMemoryUserRepository};
use bitacora::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use bitacora::outbound::storage::{CapStdObjectStore, UrlSigner};

pub const TOKEN_SECRET: &[u8] = b"integration-token-secret";
pub const SIGNING_SECRET: &[u8] = b"integration-signing-secret";
pub const BASE_URL: &str = "http://localhost:8080/api/v1";
pub const ADMIN_EMAIL: &str = "admin@hospital.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const PDF_BYTES: &[u8] = b"%PDF-1.7 manual de operacion";

/// Which store receives uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// [`InMemoryFileStore`], which can be switched offline.
    Memory,
    /// [`CapStdObjectStore`] in a temporary directory, with verifiable links.
    Disk,
}

/// Adapters and state for one isolated application instance.
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub database: InMemoryDatabase,
    pub memory_store: InMemoryFileStore,
    pub disk_store: Arc<CapStdObjectStore>,
    _storage_dir: TempDir,
}

type AccountService = UserAccountService<InMemoryUserRepository, Argon2PasswordHasher>;

fn services<F>(
    database: &InMemoryDatabase,
    files: Arc<F>,
    reader: Arc<dyn SignedFileReader>,
    clock: &Arc<dyn Clock>,
) -> (HttpStatePorts, Arc<AccountService>)
where
    F: FileStore + 'static,
{
    let users = Arc::new(database.users());
    let equipment = Arc::new(database.equipment());
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(JwtTokenCodec::new(TOKEN_SECRET));
    let accounts = Arc::new(UserAccountService::new(
        Arc::clone(&users),
        Arc::clone(&hasher),
        Arc::clone(clock),
    ));

    let ports = HttpStatePorts {
        login: Arc::new(CredentialService::new(
            users,
            hasher,
            Arc::clone(&tokens),
            Arc::clone(clock),
        )),
        sessions: Arc::new(SessionService::new(tokens, Arc::clone(clock))),
        users: accounts.clone(),
        equipment: Arc::new(EquipmentService::new(
            Arc::clone(&equipment),
            Arc::clone(&files),
            Arc::clone(clock),
        )),
        maintenance: Arc::new(MaintenanceService::new(
            Arc::new(database.maintenance()),
            equipment,
            files,
            Arc::clone(clock),
        )),
        stats: Arc::new(StatsService::new(Arc::new(database.stats()), Arc::clone(clock))),
        files: reader,
    };
    (ports, accounts)
}

impl Harness {
    /// Fresh tables, an empty store, and a seeded administrator.
    pub async fn new(storage: Storage) -> Self {
        let storage_dir = TempDir::new().expect("storage tempdir");
        let signer = UrlSigner::new(SIGNING_SECRET, BASE_URL).expect("signer");
        let disk_store =
            Arc::new(CapStdObjectStore::open(storage_dir.path(), signer).expect("open store"));
        let memory_store = InMemoryFileStore::new();
        let database = InMemoryDatabase::new();
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

        let reader: Arc<dyn SignedFileReader> = disk_store.clone();
        let (ports, accounts) = match storage {
            Storage::Memory => services(&database, Arc::new(memory_store.clone()), reader, &clock),
            Storage::Disk => services(&database, Arc::clone(&disk_store), reader, &clock),
        };
        accounts
            .ensure_bootstrap_admin(BootstrapAdmin {
                email: Email::new(ADMIN_EMAIL).expect("admin email"),
                display_name: DisplayName::new("Administrador").expect("admin name"),
                password: NewPassword::new(ADMIN_PASSWORD).expect("admin password"),
            })
            .await
            .expect("seed admin")
            .expect("admin created");

        let state = web::Data::new(HttpState::new(ports, clock, CookiePolicy { secure: false }));
        Self {
            state,
            database,
            memory_store,
            disk_store,
            _storage_dir: storage_dir,
        }
    }

    /// Initialised application mounted the way the server mounts it.
    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .service(web::scope(API_PREFIX).configure(configure_api)),
        )
        .await
    }
}

/// Send `req` and decode the body as JSON (`Null` when empty).
pub async fn send<S, B>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

/// Attach `token` as a bearer credential.
pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// Log in and return the session token set in the `accessToken` cookie.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }));
    let res = actix_test::call_service(app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::OK, "login for {email} failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .expect("session cookie")
}

/// Log in as the seeded administrator.
pub async fn login_admin<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Create an account as `admin` and return its JSON.
pub async fn create_user<S, B>(app: &S, admin: &str, email: &str, role: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = authed(TestRequest::post().uri("/api/v1/users"), admin).set_json(json!({
        "email": email,
        "displayName": format!("Usuario {email}"),
        "password": "clave123",
        "role": role,
    }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create user {email}: {body}");
    body
}

/// Minimal equipment payload; `manual` is an optional upload body.
pub fn equipment_payload(serial: &str, location: &str, manual: Option<Value>) -> Value {
    let mut payload = json!({
        "name": format!("Monitor {serial}"),
        "brand": "Philips",
        "model": "IntelliVue MX450",
        "serialNumber": serial,
        "controlId": format!("CMA-{serial}"),
        "location": location,
    });
    if let Some(manual) = manual {
        payload["manual"] = manual;
        payload["manualDescription"] = json!("Manual del fabricante");
    }
    payload
}

/// Register equipment and return the created body.
pub async fn create_equipment<S, B>(app: &S, token: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = authed(TestRequest::post().uri("/api/v1/equipment"), token).set_json(payload);
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create equipment: {body}");
    body
}

/// Log a maintenance record against `equipment_id` and return the body.
pub async fn create_maintenance<S, B>(
    app: &S,
    token: &str,
    equipment_id: &str,
    performed_on: &str,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = authed(TestRequest::post().uri("/api/v1/maintenance"), token).set_json(json!({
        "equipmentId": equipment_id,
        "maintenanceType": "Preventivo",
        "performedOn": performed_on,
        "observations": "Calibración de sensores",
    }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create maintenance: {body}");
    body
}

/// PDF upload body accepted as a manual or evidence.
pub fn pdf_upload(file_name: &str) -> Value {
    json!({
        "fileName": file_name,
        "contentType": "application/pdf",
        "contentBase64": STANDARD.encode(PDF_BYTES),
    })
}

/// String field of a JSON body.
pub fn text<'a>(body: &'a Value, field: &str) -> &'a str {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} missing from {body}"))
}
