//! Account administration handlers. Every route requires `ADMIN`.
//!
//! ```text
//! GET    /api/v1/users?page=1&limit=10&search=ana
//! POST   /api/v1/users
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! POST   /api/v1/users/{id}/reactivate
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::authorization::ADMIN_ONLY;
use crate::domain::{
    DisplayName, Email, Error, NewPassword, NewUser, Role, User, UserChanges, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::ListQuery;
use crate::inbound::http::schemas::{ErrorSchema, RoleSchema, UserPageSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_id};

const EMAIL: FieldName = FieldName::new("email");
const DISPLAY_NAME: FieldName = FieldName::new("displayName");
const PASSWORD: FieldName = FieldName::new("password");
const ROLE: FieldName = FieldName::new("role");

/// Request payload for creating an account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "luis@hospital.com")]
    pub email: String,
    #[schema(example = "Luis Pérez")]
    pub display_name: String,
    /// At least 6 characters.
    pub password: String,
    /// Defaults to `TECNICO`.
    #[schema(value_type = Option<RoleSchema>)]
    pub role: Option<String>,
}

/// Request payload for updating an account. Omitted fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// A new password is re-hashed before storage.
    pub password: Option<String>,
    #[schema(value_type = Option<RoleSchema>)]
    pub role: Option<String>,
}

/// Path parameters naming one account.
#[derive(Debug, Deserialize)]
pub struct UserPath {
    id: String,
}

impl UserPath {
    fn user_id(&self) -> Result<UserId, Error> {
        parse_id(&self.id, FieldName::new("id"))
    }
}

fn parse_email(raw: &str) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| invalid_field_error(EMAIL, err))
}

fn parse_display_name(raw: &str) -> Result<DisplayName, Error> {
    DisplayName::new(raw).map_err(|err| invalid_field_error(DISPLAY_NAME, err))
}

fn parse_password(raw: &str) -> Result<NewPassword, Error> {
    NewPassword::new(raw).map_err(|err| invalid_field_error(PASSWORD, err))
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.parse().map_err(|err| invalid_field_error(ROLE, err))
}

fn parse_new_user(body: CreateUserRequest) -> Result<NewUser, Error> {
    Ok(NewUser {
        email: parse_email(&body.email)?,
        display_name: parse_display_name(&body.display_name)?,
        password: parse_password(&body.password)?,
        role: body.role.as_deref().map(parse_role).transpose()?.unwrap_or_default(),
    })
}

fn parse_user_changes(body: UpdateUserRequest) -> Result<UserChanges, Error> {
    Ok(UserChanges {
        email: body.email.as_deref().map(parse_email).transpose()?,
        display_name: body.display_name.as_deref().map(parse_display_name).transpose()?,
        role: body.role.as_deref().map(parse_role).transpose()?,
        password: body.password.as_deref().map(parse_password).transpose()?,
    })
}

/// Page through accounts in any status, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListQuery),
    responses(
        (status = 200, description = "Users", body = UserPageSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<User>>> {
    session.require(ADMIN_ONLY)?;
    let page = state
        .users
        .list(query.search_term(), query.page_request())
        .await?;
    Ok(web::Json(page))
}

/// Register an active account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("SessionCookie" = []))
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    session.require(ADMIN_ONLY)?;
    let new_user = parse_new_user(payload.into_inner())?;
    let user = state.users.create(new_user).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch an account in any status.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("SessionCookie" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<User>> {
    session.require(ADMIN_ONLY)?;
    let user = state.users.get(&path.user_id()?).await?;
    Ok(web::Json(user))
}

/// Change name, email, role, or password.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    session.require(ADMIN_ONLY)?;
    let id = path.user_id()?;
    let changes = parse_user_changes(payload.into_inner())?;
    let user = state.users.update(&id, changes).await?;
    Ok(web::Json(user))
}

/// Mark an account `INACTIVO`. Existing tokens stay valid until expiry.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deactivated user", body = UserSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deactivateUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}")]
pub async fn deactivate_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<User>> {
    session.require(ADMIN_ONLY)?;
    let user = state.users.deactivate(&path.user_id()?).await?;
    Ok(web::Json(user))
}

/// Return an account to `ACTIVO`.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/reactivate",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Reactivated user", body = UserSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "reactivateUser",
    security(("SessionCookie" = []))
)]
#[post("/users/{id}/reactivate")]
pub async fn reactivate_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<User>> {
    session.require(ADMIN_ONLY)?;
    let user = state.users.reactivate(&path.user_id()?).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests;
