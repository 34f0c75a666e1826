//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    EquipmentRegistry, LoginService, MaintenanceLog, SessionAuthenticator, SignedFileReader,
    StatsQuery, UserAccounts,
};
use crate::inbound::http::session::CookiePolicy;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionAuthenticator>,
    pub users: Arc<dyn UserAccounts>,
    pub equipment: Arc<dyn EquipmentRegistry>,
    pub maintenance: Arc<dyn MaintenanceLog>,
    pub stats: Arc<dyn StatsQuery>,
    pub files: Arc<dyn SignedFileReader>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionAuthenticator>,
    pub users: Arc<dyn UserAccounts>,
    pub equipment: Arc<dyn EquipmentRegistry>,
    pub maintenance: Arc<dyn MaintenanceLog>,
    pub stats: Arc<dyn StatsQuery>,
    pub files: Arc<dyn SignedFileReader>,
    /// Source of "now" for signed link checks.
    pub clock: Arc<dyn Clock>,
    /// Attributes applied to the session cookies.
    pub cookies: CookiePolicy,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>, cookies: CookiePolicy) -> Self {
        let HttpStatePorts {
            login,
            sessions,
            users,
            equipment,
            maintenance,
            stats,
            files,
        } = ports;
        Self {
            login,
            sessions,
            users,
            equipment,
            maintenance,
            stats,
            files,
            clock,
            cookies,
        }
    }
}
