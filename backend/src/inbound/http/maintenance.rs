//! Maintenance log handlers.
//!
//! ```text
//! GET    /api/v1/equipment/{id}/maintenance?page=1&limit=10
//! POST   /api/v1/maintenance
//! GET    /api/v1/maintenance/{id}
//! PUT    /api/v1/maintenance/{id}           (author or ADMIN)
//! DELETE /api/v1/maintenance/{id}           (ADMIN)
//! DELETE /api/v1/maintenance/{id}/evidence  (author or ADMIN)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::authorization::{ADMIN_ONLY, STAFF};
use crate::domain::{
    AttachmentKind, EquipmentId, EquipmentSummary, Error, MaintenanceChanges, MaintenanceDraft,
    MaintenanceId, MaintenanceRecord, MaintenanceView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::equipment::EquipmentPath;
use crate::inbound::http::listing::ListQuery;
use crate::inbound::http::schemas::{
    CreatedMaintenanceSchema, ErrorSchema, MaintenancePageSchema, MaintenanceRecordSchema,
    MaintenanceViewSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::uploads::{CreatedBody, FileUploadBody, optional_upload};
use crate::inbound::http::validation::{
    FieldName, long_text, nullable, parse_id, parse_optional_rfc3339_timestamp,
    parse_rfc3339_timestamp, required_text,
};

const EVIDENCE: FieldName = FieldName::new("evidence");
const MAINTENANCE_TYPE: FieldName = FieldName::new("maintenanceType");
const PERFORMED_ON: FieldName = FieldName::new("performedOn");
const OBSERVATIONS: FieldName = FieldName::new("observations");
const NEXT_DUE: FieldName = FieldName::new("nextDue");

/// Request payload for logging maintenance. The author is the caller.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    #[schema(format = "uuid")]
    pub equipment_id: String,
    #[schema(example = "Preventivo")]
    pub maintenance_type: String,
    #[schema(format = "date-time", example = "2026-03-01T10:30:00Z")]
    pub performed_on: String,
    pub observations: String,
    #[schema(format = "date-time")]
    pub next_due: Option<String>,
    /// Optional PDF or image evidence.
    pub evidence: Option<FileUploadBody>,
}

/// Request payload for updating a record. Omitted fields are unchanged;
/// `nextDue: null` clears the due date.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceRequest {
    pub maintenance_type: Option<String>,
    #[schema(format = "date-time")]
    pub performed_on: Option<String>,
    pub observations: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub next_due: Option<Option<String>>,
    /// Replaces the current evidence; the old object is deleted afterwards.
    pub evidence: Option<FileUploadBody>,
}

/// Record with author name, equipment summary, and a fresh evidence link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceViewBody {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub author_name: String,
    pub equipment: EquipmentSummary,
    pub evidence_url: Option<String>,
}

impl From<MaintenanceView> for MaintenanceViewBody {
    fn from(value: MaintenanceView) -> Self {
        Self {
            record: value.details.record,
            author_name: value.details.author_name,
            equipment: value.details.equipment,
            evidence_url: value.evidence_url.map(|url| url.as_str().to_owned()),
        }
    }
}

/// Path parameters naming one record.
#[derive(Debug, Deserialize)]
pub struct MaintenancePath {
    id: String,
}

impl MaintenancePath {
    fn maintenance_id(&self) -> Result<MaintenanceId, Error> {
        parse_id(&self.id, FieldName::new("id"))
    }
}

fn parse_draft(body: &CreateMaintenanceRequest) -> Result<MaintenanceDraft, Error> {
    Ok(MaintenanceDraft {
        equipment_id: parse_id::<EquipmentId>(&body.equipment_id, FieldName::new("equipmentId"))?,
        maintenance_type: required_text(&body.maintenance_type, MAINTENANCE_TYPE)?,
        performed_on: parse_rfc3339_timestamp(body.performed_on.clone(), PERFORMED_ON)?,
        observations: long_text(&body.observations, OBSERVATIONS)?,
        next_due: parse_optional_rfc3339_timestamp(body.next_due.clone(), NEXT_DUE)?,
    })
}

fn parse_changes(body: &UpdateMaintenanceRequest) -> Result<MaintenanceChanges, Error> {
    Ok(MaintenanceChanges {
        maintenance_type: body
            .maintenance_type
            .as_deref()
            .map(|raw| required_text(raw, MAINTENANCE_TYPE))
            .transpose()?,
        performed_on: parse_optional_rfc3339_timestamp(body.performed_on.clone(), PERFORMED_ON)?,
        observations: body
            .observations
            .as_deref()
            .map(|raw| long_text(raw, OBSERVATIONS))
            .transpose()?,
        next_due: body
            .next_due
            .clone()
            .map(|next| parse_optional_rfc3339_timestamp(next, NEXT_DUE))
            .transpose()?,
    })
}

/// Page through the active records of one equipment item, newest first.
///
/// Unknown or inactive equipment yields an empty page.
#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}/maintenance",
    params(("id" = String, Path, description = "Equipment identifier"), ListQuery),
    responses(
        (status = 200, description = "Maintenance records", body = MaintenancePageSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["maintenance"],
    operation_id = "listEquipmentMaintenance",
    security(("SessionCookie" = []))
)]
#[get("/equipment/{id}/maintenance")]
pub async fn list_equipment_maintenance(
    state: web::Data<HttpState>,
    _session: SessionContext,
    path: web::Path<EquipmentPath>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<MaintenanceViewBody>>> {
    let page = state
        .maintenance
        .list_for_equipment(&path.equipment_id()?, query.page_request())
        .await?;
    Ok(web::Json(page.map(MaintenanceViewBody::from)))
}

/// Log maintenance on active equipment.
///
/// Evidence that fails to store does not undo the record; `attachment`
/// reports `upload_failed` instead.
#[utoipa::path(
    post,
    path = "/api/v1/maintenance",
    request_body = CreateMaintenanceRequest,
    responses(
        (status = 201, description = "Maintenance logged", body = CreatedMaintenanceSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 404, description = "Equipment not found or inactive", body = ErrorSchema)
    ),
    tags = ["maintenance"],
    operation_id = "createMaintenance",
    security(("SessionCookie" = []))
)]
#[post("/maintenance")]
pub async fn create_maintenance(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateMaintenanceRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require(STAFF)?;
    let body = payload.into_inner();
    let draft = parse_draft(&body)?;
    let evidence = optional_upload(body.evidence, AttachmentKind::Evidence, EVIDENCE)?;
    let outcome = state.maintenance.record(author, draft, evidence).await?;
    Ok(HttpResponse::Created().json(CreatedBody::from(outcome)))
}

/// Active record with an evidence link valid for 20 minutes.
#[utoipa::path(
    get,
    path = "/api/v1/maintenance/{id}",
    params(("id" = String, Path, description = "Maintenance record identifier")),
    responses(
        (status = 200, description = "Maintenance record", body = MaintenanceViewSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 404, description = "Not found or inactive", body = ErrorSchema)
    ),
    tags = ["maintenance"],
    operation_id = "getMaintenance",
    security(("SessionCookie" = []))
)]
#[get("/maintenance/{id}")]
pub async fn get_maintenance(
    state: web::Data<HttpState>,
    _session: SessionContext,
    path: web::Path<MaintenancePath>,
) -> ApiResult<web::Json<MaintenanceViewBody>> {
    let view = state
        .maintenance
        .find(&path.maintenance_id()?)
        .await?
        .ok_or_else(|| Error::not_found("maintenance record not found"))?;
    Ok(web::Json(view.into()))
}

/// Update fields and optionally replace the evidence.
#[utoipa::path(
    put,
    path = "/api/v1/maintenance/{id}",
    params(("id" = String, Path, description = "Maintenance record identifier")),
    request_body = UpdateMaintenanceRequest,
    responses(
        (status = 200, description = "Updated record", body = MaintenanceRecordSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Neither author nor administrator", body = ErrorSchema),
        (status = 404, description = "Not found or inactive", body = ErrorSchema),
        (status = 503, description = "Evidence could not be stored", body = ErrorSchema)
    ),
    tags = ["maintenance"],
    operation_id = "updateMaintenance",
    security(("SessionCookie" = []))
)]
#[put("/maintenance/{id}")]
pub async fn update_maintenance(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<MaintenancePath>,
    payload: web::Json<UpdateMaintenanceRequest>,
) -> ApiResult<web::Json<MaintenanceRecord>> {
    let caller = session.require(STAFF)?;
    let id = path.maintenance_id()?;
    let body = payload.into_inner();
    let changes = parse_changes(&body)?;
    let evidence = optional_upload(body.evidence, AttachmentKind::Evidence, EVIDENCE)?;
    let updated = state
        .maintenance
        .update(caller, &id, changes, evidence)
        .await?;
    Ok(web::Json(updated))
}

/// Soft-delete a record and discard its evidence.
#[utoipa::path(
    delete,
    path = "/api/v1/maintenance/{id}",
    params(("id" = String, Path, description = "Maintenance record identifier")),
    responses(
        (status = 204, description = "Record deactivated"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found or inactive", body = ErrorSchema)
    ),
    tags = ["maintenance"],
    operation_id = "deactivateMaintenance",
    security(("SessionCookie" = []))
)]
#[delete("/maintenance/{id}")]
pub async fn deactivate_maintenance(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<MaintenancePath>,
) -> ApiResult<HttpResponse> {
    session.require(ADMIN_ONLY)?;
    state
        .maintenance
        .deactivate(&path.maintenance_id()?)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete the evidence and clear its reference.
#[utoipa::path(
    delete,
    path = "/api/v1/maintenance/{id}/evidence",
    params(("id" = String, Path, description = "Maintenance record identifier")),
    responses(
        (status = 200, description = "Record without evidence", body = MaintenanceRecordSchema),
        (status = 403, description = "Neither author nor administrator", body = ErrorSchema),
        (status = 404, description = "No such record or no evidence", body = ErrorSchema)
    ),
    tags = ["maintenance"],
    operation_id = "removeMaintenanceEvidence",
    security(("SessionCookie" = []))
)]
#[delete("/maintenance/{id}/evidence")]
pub async fn remove_evidence(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<MaintenancePath>,
) -> ApiResult<web::Json<MaintenanceRecord>> {
    let caller = session.require(STAFF)?;
    let updated = state
        .maintenance
        .remove_evidence(caller, &path.maintenance_id()?)
        .await?;
    Ok(web::Json(updated))
}
