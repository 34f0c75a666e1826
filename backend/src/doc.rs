//! OpenAPI documentation for the REST API.
//!
//! Registers every `/api/v1` handler, the schema wrappers from
//! [`crate::inbound::http::schemas`], and the session cookie scheme. The
//! document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::{IdentityBody, LoginRequest, SessionBody};
use crate::inbound::http::equipment::{CreateEquipmentRequest, UpdateEquipmentRequest};
use crate::inbound::http::maintenance::{CreateMaintenanceRequest, UpdateMaintenanceRequest};
use crate::inbound::http::schemas::{
    AttachmentStatusSchema, CreatedEquipmentSchema, CreatedMaintenanceSchema,
    EquipmentDetailSchema, EquipmentOverviewSchema, EquipmentPageSchema, EquipmentSchema,
    EquipmentSummarySchema, ErrorCodeSchema, ErrorSchema, MaintenancePageSchema,
    MaintenanceRecordSchema, MaintenanceViewSchema, RecentMaintenanceSchema, RecordStatusSchema,
    RoleSchema, SystemStatsSchema, UpcomingMaintenanceSchema, UserPageSchema, UserSchema,
};
use crate::inbound::http::session::ACCESS_TOKEN_COOKIE;
use crate::inbound::http::uploads::FileUploadBody;
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};
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
                ACCESS_TOKEN_COOKIE,
                "Signed session token set by POST /api/v1/auth/login. \
                 An `Authorization: Bearer` header is accepted as well.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bitácora CMA API",
        description = "Inventory and maintenance log for hospital medical equipment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::deactivate_user,
        crate::inbound::http::users::reactivate_user,
        crate::inbound::http::equipment::list_equipment,
        crate::inbound::http::equipment::create_equipment,
        crate::inbound::http::equipment::get_equipment,
        crate::inbound::http::equipment::update_equipment,
        crate::inbound::http::equipment::deactivate_equipment,
        crate::inbound::http::equipment::remove_manual,
        crate::inbound::http::maintenance::list_equipment_maintenance,
        crate::inbound::http::maintenance::create_maintenance,
        crate::inbound::http::maintenance::get_maintenance,
        crate::inbound::http::maintenance::update_maintenance,
        crate::inbound::http::maintenance::deactivate_maintenance,
        crate::inbound::http::maintenance::remove_evidence,
        crate::inbound::http::stats::system_stats,
        crate::inbound::http::stats::upcoming_maintenance,
        crate::inbound::http::stats::equipment_overview,
        crate::inbound::http::stats::recent_maintenance,
        crate::inbound::http::files::download_file,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleSchema,
        RecordStatusSchema,
        AttachmentStatusSchema,
        UserSchema,
        UserPageSchema,
        EquipmentSchema,
        EquipmentDetailSchema,
        CreatedEquipmentSchema,
        EquipmentPageSchema,
        EquipmentSummarySchema,
        MaintenanceRecordSchema,
        MaintenanceViewSchema,
        CreatedMaintenanceSchema,
        MaintenancePageSchema,
        SystemStatsSchema,
        UpcomingMaintenanceSchema,
        EquipmentOverviewSchema,
        RecentMaintenanceSchema,
        LoginRequest,
        SessionBody,
        IdentityBody,
        CreateUserRequest,
        UpdateUserRequest,
        CreateEquipmentRequest,
        UpdateEquipmentRequest,
        CreateMaintenanceRequest,
        UpdateMaintenanceRequest,
        FileUploadBody,
    )),
    tags(
        (name = "auth", description = "Login, logout, and the current identity"),
        (name = "users", description = "Account administration (ADMIN)"),
        (name = "equipment", description = "Medical equipment inventory"),
        (name = "maintenance", description = "Maintenance log"),
        (name = "stats", description = "Dashboard counters"),
        (name = "files", description = "Signed attachment downloads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
