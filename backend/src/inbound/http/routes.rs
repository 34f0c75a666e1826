//! Registration of every `/api/v1` handler.

use actix_web::web;

use crate::inbound::http::auth::{login, logout, me};
use crate::inbound::http::equipment::{
    create_equipment, deactivate_equipment, get_equipment, list_equipment, remove_manual,
    update_equipment,
};
use crate::inbound::http::files::download_file;
use crate::inbound::http::maintenance::{
    create_maintenance, deactivate_maintenance, get_maintenance, list_equipment_maintenance,
    remove_evidence, update_maintenance,
};
use crate::inbound::http::stats::{
    equipment_overview, recent_maintenance, system_stats, upcoming_maintenance,
};
use crate::inbound::http::uploads::json_config;
use crate::inbound::http::users::{
    create_user, deactivate_user, get_user, list_users, reactivate_user, update_user,
};

/// Mount path of the versioned API.
pub const API_PREFIX: &str = "/api/v1";

/// Register the API handlers and the JSON extractor limits on `cfg`.
///
/// Used inside `web::scope(API_PREFIX).configure(configure_api)`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(login)
        .service(logout)
        .service(me)
        .service(list_users)
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(deactivate_user)
        .service(reactivate_user)
        .service(list_equipment)
        .service(create_equipment)
        .service(get_equipment)
        .service(update_equipment)
        .service(deactivate_equipment)
        .service(remove_manual)
        .service(list_equipment_maintenance)
        .service(create_maintenance)
        .service(get_maintenance)
        .service(update_maintenance)
        .service(deactivate_maintenance)
        .service(remove_evidence)
        .service(system_stats)
        .service(upcoming_maintenance)
        .service(equipment_overview)
        .service(recent_maintenance)
        .service(download_file);
}
