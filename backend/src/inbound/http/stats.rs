//! Dashboard statistics.
//!
//! ```text
//! GET /api/v1/stats
//! GET /api/v1/stats/upcoming-maintenance
//! GET /api/v1/stats/equipment-overview
//! GET /api/v1/stats/recent-maintenance?equipmentId=
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    EquipmentId, EquipmentOverview, RecentMaintenance, SystemStats, UpcomingMaintenance,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    EquipmentOverviewSchema, ErrorSchema, RecentMaintenanceSchema, SystemStatsSchema,
    UpcomingMaintenanceSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// `?equipmentId=` filter for the recent maintenance feed.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RecentMaintenanceQuery {
    /// Restrict the feed to one equipment item.
    pub equipment_id: Option<String>,
}

impl RecentMaintenanceQuery {
    fn equipment_id(&self) -> ApiResult<Option<EquipmentId>> {
        match self.equipment_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_id(raw, FieldName::new("equipmentId")).map(Some),
        }
    }
}

/// System-wide counters.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Counters", body = SystemStatsSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "systemStats",
    security(("SessionCookie" = []))
)]
#[get("/stats")]
pub async fn system_stats(
    state: web::Data<HttpState>,
    _session: SessionContext,
) -> ApiResult<web::Json<SystemStats>> {
    Ok(web::Json(state.stats.system_stats().await?))
}

/// Active records due within the next 30 days, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/stats/upcoming-maintenance",
    responses(
        (status = 200, description = "Upcoming maintenance", body = [UpcomingMaintenanceSchema]),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "upcomingMaintenance",
    security(("SessionCookie" = []))
)]
#[get("/stats/upcoming-maintenance")]
pub async fn upcoming_maintenance(
    state: web::Data<HttpState>,
    _session: SessionContext,
) -> ApiResult<web::Json<Vec<UpcomingMaintenance>>> {
    Ok(web::Json(state.stats.upcoming_maintenance().await?))
}

/// Ten most recently registered active equipment items with their active
/// maintenance count and latest service date.
#[utoipa::path(
    get,
    path = "/api/v1/stats/equipment-overview",
    responses(
        (status = 200, description = "Equipment overview", body = [EquipmentOverviewSchema]),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "equipmentOverview",
    security(("SessionCookie" = []))
)]
#[get("/stats/equipment-overview")]
pub async fn equipment_overview(
    state: web::Data<HttpState>,
    _session: SessionContext,
) -> ApiResult<web::Json<Vec<EquipmentOverview>>> {
    Ok(web::Json(state.stats.equipment_overview().await?))
}

/// Twenty latest active maintenance records, newest performed first.
#[utoipa::path(
    get,
    path = "/api/v1/stats/recent-maintenance",
    params(RecentMaintenanceQuery),
    responses(
        (status = 200, description = "Recent maintenance", body = [RecentMaintenanceSchema]),
        (status = 400, description = "Malformed equipmentId", body = ErrorSchema),
        (status = 401, description = "Unauthenticated", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "recentMaintenance",
    security(("SessionCookie" = []))
)]
#[get("/stats/recent-maintenance")]
pub async fn recent_maintenance(
    state: web::Data<HttpState>,
    _session: SessionContext,
    query: web::Query<RecentMaintenanceQuery>,
) -> ApiResult<web::Json<Vec<RecentMaintenance>>> {
    let equipment_id = query.equipment_id()?;
    Ok(web::Json(state.stats.recent_maintenance(equipment_id).await?))
}
