//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Email or password did not match an account.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// The account has been deactivated.
    #[schema(rename = "account_disabled")]
    AccountDisabled,
    /// No session token accompanied the request.
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    /// The session token is malformed, tampered with, or expired.
    #[schema(rename = "invalid_token")]
    InvalidToken,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "serialNumber must not be empty")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    /// Administrator.
    #[schema(rename = "ADMIN")]
    Admin,
    /// Technician.
    #[schema(rename = "TECNICO")]
    Tecnico,
}

/// OpenAPI schema for [`crate::domain::RecordStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RecordStatus)]
pub enum RecordStatusSchema {
    /// Visible and editable.
    #[schema(rename = "ACTIVO")]
    Activo,
    /// Soft-deleted.
    #[schema(rename = "INACTIVO")]
    Inactivo,
}

/// OpenAPI schema for [`crate::domain::AttachmentStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AttachmentStatus)]
pub enum AttachmentStatusSchema {
    /// The request carried no file.
    #[schema(rename = "not_provided")]
    NotProvided,
    /// The file was stored and linked.
    #[schema(rename = "stored")]
    Stored,
    /// The row exists but the file could not be stored.
    #[schema(rename = "upload_failed")]
    UploadFailed,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
pub struct UserSchema {
    #[schema(format = "uuid", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "admin@hospital.com")]
    email: String,
    #[schema(example = "Ana Torres")]
    display_name: String,
    role: RoleSchema,
    status: RecordStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Equipment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Equipment, rename_all = "camelCase")]
pub struct EquipmentSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(example = "Monitor de signos vitales")]
    name: String,
    #[schema(example = "Philips")]
    brand: String,
    #[schema(example = "IntelliVue MX450")]
    model: String,
    #[schema(example = "SN-0001")]
    serial_number: String,
    #[schema(example = "CMA-001")]
    control_id: String,
    #[schema(example = "UCI")]
    location: String,
    status: RecordStatusSchema,
    /// Storage key of the manual; never a URL.
    manual_key: Option<String>,
    manual_description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
}

/// Equipment detail: the row plus a fresh manual link.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct EquipmentDetailSchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    brand: String,
    model: String,
    serial_number: String,
    control_id: String,
    location: String,
    status: RecordStatusSchema,
    manual_key: Option<String>,
    manual_description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    /// Signed link valid for 20 minutes; null when there is no manual or
    /// signing failed.
    manual_url: Option<String>,
}

/// Newly registered equipment and the fate of its manual.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreatedEquipmentSchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    brand: String,
    model: String,
    serial_number: String,
    control_id: String,
    location: String,
    status: RecordStatusSchema,
    manual_key: Option<String>,
    manual_description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    attachment: AttachmentStatusSchema,
}

/// OpenAPI schema for [`crate::domain::EquipmentSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EquipmentSummary)]
pub struct EquipmentSummarySchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    model: String,
}

/// OpenAPI schema for [`crate::domain::MaintenanceRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MaintenanceRecord, rename_all = "camelCase")]
pub struct MaintenanceRecordSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    equipment_id: String,
    #[schema(example = "Preventivo")]
    maintenance_type: String,
    #[schema(format = "date-time")]
    performed_on: String,
    observations: String,
    #[schema(format = "uuid")]
    author_id: String,
    evidence_key: Option<String>,
    #[schema(format = "date-time")]
    next_due: Option<String>,
    status: RecordStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
}

/// Maintenance record with author, equipment, and a fresh evidence link.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct MaintenanceViewSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    equipment_id: String,
    maintenance_type: String,
    #[schema(format = "date-time")]
    performed_on: String,
    observations: String,
    #[schema(format = "uuid")]
    author_id: String,
    evidence_key: Option<String>,
    #[schema(format = "date-time")]
    next_due: Option<String>,
    status: RecordStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
    author_name: String,
    equipment: EquipmentSummarySchema,
    evidence_url: Option<String>,
}

/// Newly logged maintenance and the fate of its evidence.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreatedMaintenanceSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    equipment_id: String,
    maintenance_type: String,
    #[schema(format = "date-time")]
    performed_on: String,
    observations: String,
    #[schema(format = "uuid")]
    author_id: String,
    evidence_key: Option<String>,
    #[schema(format = "date-time")]
    next_due: Option<String>,
    status: RecordStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
    attachment: AttachmentStatusSchema,
}

/// OpenAPI schema for [`crate::domain::SystemStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SystemStats, rename_all = "camelCase")]
pub struct SystemStatsSchema {
    total_equipment: u64,
    active_equipment: u64,
    total_maintenance: u64,
    maintenance_this_month: u64,
    total_users: u64,
    active_users: u64,
    upcoming_maintenance: u64,
}

/// OpenAPI schema for [`crate::domain::UpcomingMaintenance`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UpcomingMaintenance, rename_all = "camelCase")]
pub struct UpcomingMaintenanceSchema {
    #[schema(format = "uuid")]
    record_id: String,
    equipment: EquipmentSummarySchema,
    maintenance_type: String,
    #[schema(format = "date-time")]
    next_due: String,
    author_name: String,
}

/// OpenAPI schema for [`crate::domain::EquipmentOverview`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EquipmentOverview, rename_all = "camelCase")]
pub struct EquipmentOverviewSchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    brand: String,
    model: String,
    location: String,
    maintenance_count: u64,
    #[schema(format = "date-time")]
    last_performed_on: Option<String>,
}

/// OpenAPI schema for [`crate::domain::RecentMaintenance`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RecentMaintenance, rename_all = "camelCase")]
pub struct RecentMaintenanceSchema {
    #[schema(format = "uuid")]
    record_id: String,
    equipment: EquipmentSummarySchema,
    location: String,
    maintenance_type: String,
    #[schema(format = "date-time")]
    performed_on: String,
    observations: String,
    author_name: String,
}

macro_rules! page_schema {
    ($(#[$meta:meta])* $name:ident => $item:ty) => {
        $(#[$meta])*
        #[derive(ToSchema)]
        #[schema(rename_all = "camelCase")]
        pub struct $name {
            data: Vec<$item>,
            total: u64,
            page: u32,
            total_pages: u64,
            /// Echo of the applied search term.
            search: Option<String>,
        }
    };
}

page_schema! {
    /// One page of user accounts.
    UserPageSchema => UserSchema
}

page_schema! {
    /// One page of active equipment.
    EquipmentPageSchema => EquipmentSchema
}

page_schema! {
    /// One page of maintenance records with author and equipment.
    MaintenancePageSchema => MaintenanceViewSchema
}
