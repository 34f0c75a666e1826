//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define the strongly typed entities used by the HTTP and
//! persistence layers, and the services that implement the driving ports.
//! Types validate on construction so adapters never see malformed values.
//!
//! Public surface:
//! - Error and ErrorCode: the single discriminated failure type.
//! - User, Equipment, MaintenanceRecord: the three managed entities.
//! - Identity and SessionToken: the authenticated caller and its credential.
//! - Services: [`CredentialService`], [`SessionService`],
//!   [`UserAccountService`], [`EquipmentService`], [`MaintenanceService`],
//!   [`StatsService`].

pub mod attachment;
pub mod auth;
pub mod authorization;
pub mod equipment;
pub mod error;
pub mod ids;
pub mod maintenance;
pub mod ports;
pub mod search;
pub mod stats;
pub mod status;
pub mod text;
pub mod trace_id;
pub mod user;

mod credential_service;
mod equipment_service;
mod maintenance_service;
mod service_support;
mod session_service;
mod stats_service;
mod user_account_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::attachment::{
    AttachmentKind, AttachmentStatus, CreateOutcome, FileKey, FileUpload, InvalidFileKey,
    MAX_UPLOAD_BYTES, SIGNED_URL_TTL, SignedUrl, UploadValidationError,
};
pub use self::auth::{
    Identity, IssuedSession, LoginCredentials, LoginValidationError, SESSION_TTL, SessionToken,
};
pub use self::credential_service::CredentialService;
pub use self::equipment::{
    Equipment, EquipmentChanges, EquipmentDraft, EquipmentPatch, EquipmentSummary, EquipmentView,
};
pub use self::equipment_service::EquipmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{EquipmentId, InvalidIdentifier, MaintenanceId, UserId};
pub use self::maintenance::{
    MaintenanceChanges, MaintenanceDetails, MaintenanceDraft, MaintenancePatch, MaintenanceRecord,
    MaintenanceView,
};
pub use self::maintenance_service::MaintenanceService;
pub use self::search::SearchTerm;
pub use self::session_service::SessionService;
pub use self::stats::{
    EQUIPMENT_OVERVIEW_LIMIT, EquipmentOverview, RECENT_MAINTENANCE_LIMIT, RecentMaintenance,
    StatsWindow, SystemStats, UPCOMING_WINDOW, UpcomingMaintenance,
};
pub use self::stats_service::StatsService;
pub use self::status::{RecordStatus, UnknownStatus};
pub use self::text::{LONG_TEXT_MAX, RequiredText, TEXT_MAX, TextValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, Email, NewPassword, NewUser, PasswordHash, Role, User, UserChanges,
    UserCredentials, UserPatch, UserValidationError,
};
pub use self::user_account_service::{BootstrapAdmin, UserAccountService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bitacora::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
