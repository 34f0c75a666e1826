//! Session endpoints.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"admin@hospital.com","password":"secreta"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, Identity, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::schemas::{ErrorSchema, RoleSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@hospital.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Caller identity as encoded in the session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub display_name: String,
    #[schema(value_type = RoleSchema)]
    pub role: String,
}

impl From<&Identity> for IdentityBody {
    fn from(value: &Identity) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            display_name: value.display_name.to_string(),
            role: value.role.as_str().to_owned(),
        }
    }
}

/// Response payload for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    pub user: IdentityBody,
    #[schema(format = "date-time")]
    pub expires_at: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Exchange credentials for a session.
///
/// The token travels in the `accessToken` cookie; the body only describes
/// the session so clients can render the caller.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionBody,
            headers(("Set-Cookie" = String, description = "accessToken and session_exists cookies"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Account disabled", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.login.login(&credentials).await?;
    let [access, flag] = state.cookies.session_cookies(session.token.as_str())?;

    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .cookie(access)
        .cookie(flag)
        .json(SessionBody {
            user: IdentityBody::from(&session.identity),
            expires_at: session.expires_at.to_rfc3339(),
        }))
}

/// Drop the session cookies.
///
/// Tokens are stateless, so a copied token stays valid until it expires.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Cookies cleared"),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    info!(user_id = %session.identity().user_id, "session closed");
    let [access, flag] = state.cookies.cleared_cookies();
    HttpResponse::NoContent().cookie(access).cookie(flag).finish()
}

/// Identity of the current caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityBody),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentIdentity",
    security(("SessionCookie" = []))
)]
#[get("/auth/me")]
pub async fn me(session: SessionContext) -> web::Json<IdentityBody> {
    web::Json(IdentityBody::from(session.identity()))
}
