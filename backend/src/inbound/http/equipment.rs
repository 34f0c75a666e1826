//! Equipment inventory handlers.
//!
//! ```text
//! GET    /api/v1/equipment?page=1&limit=10&search=philips
//! POST   /api/v1/equipment
//! GET    /api/v1/equipment/{id}
//! PUT    /api/v1/equipment/{id}
//! DELETE /api/v1/equipment/{id}          (ADMIN)
//! DELETE /api/v1/equipment/{id}/manual
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::authorization::{ADMIN_ONLY, STAFF};
use crate::domain::{
    AttachmentKind, Equipment, EquipmentChanges, EquipmentDraft, EquipmentId, EquipmentView,
    Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::ListQuery;
use crate::inbound::http::schemas::{
    CreatedEquipmentSchema, EquipmentDetailSchema, EquipmentPageSchema, EquipmentSchema,
    ErrorSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::uploads::{CreatedBody, FileUploadBody, optional_upload};
use crate::inbound::http::validation::{FieldName, optional_text, parse_id, required_text};

const MANUAL: FieldName = FieldName::new("manual");

/// Request payload for registering equipment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentRequest {
    #[schema(example = "Monitor de signos vitales")]
    pub name: String,
    #[schema(example = "Philips")]
    pub brand: String,
    #[schema(example = "IntelliVue MX450")]
    pub model: String,
    /// Unique across all equipment, active or not.
    #[schema(example = "SN-0001")]
    pub serial_number: String,
    #[schema(example = "CMA-001")]
    pub control_id: String,
    #[schema(example = "UCI")]
    pub location: String,
    /// Stored only when a manual is attached.
    pub manual_description: Option<String>,
    /// Optional PDF manual.
    pub manual: Option<FileUploadBody>,
}

/// Request payload for updating equipment. Omitted fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub control_id: Option<String>,
    pub location: Option<String>,
    pub manual_description: Option<String>,
    /// Replaces the current manual; the old object is deleted afterwards.
    pub manual: Option<FileUploadBody>,
}

/// Equipment with a freshly signed manual link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDetailBody {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub manual_url: Option<String>,
}

impl From<EquipmentView> for EquipmentDetailBody {
    fn from(value: EquipmentView) -> Self {
        Self {
            equipment: value.equipment,
            manual_url: value.manual_url.map(|url| url.as_str().to_owned()),
        }
    }
}

/// Path parameters naming one equipment item.
#[derive(Debug, Deserialize)]
pub struct EquipmentPath {
    id: String,
}

impl EquipmentPath {
    pub(crate) fn equipment_id(&self) -> Result<EquipmentId, Error> {
        parse_id(&self.id, FieldName::new("id"))
    }
}

fn parse_draft(body: &CreateEquipmentRequest) -> Result<EquipmentDraft, Error> {
    Ok(EquipmentDraft {
        name: required_text(&body.name, FieldName::new("name"))?,
        brand: required_text(&body.brand, FieldName::new("brand"))?,
        model: required_text(&body.model, FieldName::new("model"))?,
        serial_number: required_text(&body.serial_number, FieldName::new("serialNumber"))?,
        control_id: required_text(&body.control_id, FieldName::new("controlId"))?,
        location: required_text(&body.location, FieldName::new("location"))?,
        manual_description: optional_text(
            body.manual_description.clone(),
            FieldName::new("manualDescription"),
        )?,
    })
}

fn parse_changes(body: &UpdateEquipmentRequest) -> Result<EquipmentChanges, Error> {
    Ok(EquipmentChanges {
        name: optional_text(body.name.clone(), FieldName::new("name"))?,
        brand: optional_text(body.brand.clone(), FieldName::new("brand"))?,
        model: optional_text(body.model.clone(), FieldName::new("model"))?,
        serial_number: optional_text(body.serial_number.clone(), FieldName::new("serialNumber"))?,
        control_id: optional_text(body.control_id.clone(), FieldName::new("controlId"))?,
        location: optional_text(body.location.clone(), FieldName::new("location"))?,
        manual_description: body
            .manual_description
            .as_deref()
            .map(|text| text.trim().to_owned()),
    })
}

/// Page through active equipment, newest first.
///
/// `search` matches name, brand, model, serial number, control id, and
/// location.
#[utoipa::path(
    get,
    path = "/api/v1/equipment",
    params(ListQuery),
    responses(
        (status = 200, description = "Equipment", body = EquipmentPageSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["equipment"],
    operation_id = "listEquipment",
    security(("SessionCookie" = []))
)]
#[get("/equipment")]
pub async fn list_equipment(
    state: web::Data<HttpState>,
    _session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<Equipment>>> {
    let page = state
        .equipment
        .list(query.search_term(), query.page_request())
        .await?;
    Ok(web::Json(page))
}

/// Register equipment, optionally with its manual.
///
/// A manual that fails to store does not undo the registration; the
/// `attachment` field reports `upload_failed` instead.
#[utoipa::path(
    post,
    path = "/api/v1/equipment",
    request_body = CreateEquipmentRequest,
    responses(
        (status = 201, description = "Equipment registered", body = CreatedEquipmentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 409, description = "Serial number already registered", body = ErrorSchema)
    ),
    tags = ["equipment"],
    operation_id = "createEquipment",
    security(("SessionCookie" = []))
)]
#[post("/equipment")]
pub async fn create_equipment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEquipmentRequest>,
) -> ApiResult<HttpResponse> {
    session.require(STAFF)?;
    let body = payload.into_inner();
    let draft = parse_draft(&body)?;
    let manual = optional_upload(body.manual, AttachmentKind::Manual, MANUAL)?;
    let outcome = state.equipment.register(draft, manual).await?;
    Ok(HttpResponse::Created().json(CreatedBody::from(outcome)))
}

/// Active equipment with a manual link valid for 20 minutes.
#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}",
    params(("id" = String, Path, description = "Equipment identifier")),
    responses(
        (status = 200, description = "Equipment", body = EquipmentDetailSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema),
        (status = 404, description = "Not found or inactive", body = ErrorSchema)
    ),
    tags = ["equipment"],
    operation_id = "getEquipment",
    security(("SessionCookie" = []))
)]
#[get("/equipment/{id}")]
pub async fn get_equipment(
    state: web::Data<HttpState>,
    _session: SessionContext,
    path: web::Path<EquipmentPath>,
) -> ApiResult<web::Json<EquipmentDetailBody>> {
    let view = state
        .equipment
        .find(&path.equipment_id()?)
        .await?
        .ok_or_else(|| Error::not_found("equipment not found"))?;
    Ok(web::Json(view.into()))
}

/// Update fields and optionally replace the manual.
#[utoipa::path(
    put,
    path = "/api/v1/equipment/{id}",
    params(("id" = String, Path, description = "Equipment identifier")),
    request_body = UpdateEquipmentRequest,
    responses(
        (status = 200, description = "Updated equipment", body = EquipmentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found or inactive", body = ErrorSchema),
        (status = 409, description = "Serial number already registered", body = ErrorSchema),
        (status = 503, description = "Manual could not be stored", body = ErrorSchema)
    ),
    tags = ["equipment"],
    operation_id = "updateEquipment",
    security(("SessionCookie" = []))
)]
#[put("/equipment/{id}")]
pub async fn update_equipment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EquipmentPath>,
    payload: web::Json<UpdateEquipmentRequest>,
) -> ApiResult<web::Json<Equipment>> {
    session.require(STAFF)?;
    let id = path.equipment_id()?;
    let body = payload.into_inner();
    let changes = parse_changes(&body)?;
    let manual = optional_upload(body.manual, AttachmentKind::Manual, MANUAL)?;
    let updated = state.equipment.update(&id, changes, manual).await?;
    Ok(web::Json(updated))
}

/// Soft-delete equipment and discard its manual.
///
/// Succeeds even when the store cannot delete the manual.
#[utoipa::path(
    delete,
    path = "/api/v1/equipment/{id}",
    params(("id" = String, Path, description = "Equipment identifier")),
    responses(
        (status = 204, description = "Equipment deactivated"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found or inactive", body = ErrorSchema)
    ),
    tags = ["equipment"],
    operation_id = "deactivateEquipment",
    security(("SessionCookie" = []))
)]
#[delete("/equipment/{id}")]
pub async fn deactivate_equipment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EquipmentPath>,
) -> ApiResult<HttpResponse> {
    session.require(ADMIN_ONLY)?;
    state.equipment.deactivate(&path.equipment_id()?).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete the manual and clear its reference.
#[utoipa::path(
    delete,
    path = "/api/v1/equipment/{id}/manual",
    params(("id" = String, Path, description = "Equipment identifier")),
    responses(
        (status = 200, description = "Equipment without manual", body = EquipmentSchema),
        (status = 404, description = "No such equipment or no manual", body = ErrorSchema)
    ),
    tags = ["equipment"],
    operation_id = "removeEquipmentManual",
    security(("SessionCookie" = []))
)]
#[delete("/equipment/{id}/manual")]
pub async fn remove_manual(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EquipmentPath>,
) -> ApiResult<web::Json<Equipment>> {
    session.require(STAFF)?;
    let updated = state.equipment.remove_manual(&path.equipment_id()?).await?;
    Ok(web::Json(updated))
}
