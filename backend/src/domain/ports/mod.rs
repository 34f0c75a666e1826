//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the file store, the token codec, and the
//! password hasher) carry typed errors generated by `define_port_error!` so
//! adapters map their failures into predictable variants. Driving ports are
//! the use-cases the HTTP layer calls and speak the domain [`Error`].
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod equipment_registry;
mod equipment_repository;
mod file_store;
mod login_service;
mod maintenance_log;
mod maintenance_repository;
mod password_hasher;
mod stats_query;
mod stats_repository;
mod token_codec;
mod user_accounts;
mod user_repository;

pub use equipment_registry::EquipmentRegistry;
#[cfg(test)]
pub use equipment_registry::MockEquipmentRegistry;
#[cfg(test)]
pub use equipment_repository::MockEquipmentRepository;
pub use equipment_repository::{EquipmentPersistenceError, EquipmentRepository};
#[cfg(test)]
pub use file_store::{MockFileStore, MockSignedFileReader};
pub use file_store::{FileStore, FileStoreError, SignedFileReader, StoredFile};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginService, SessionAuthenticator};
pub use maintenance_log::MaintenanceLog;
#[cfg(test)]
pub use maintenance_log::MockMaintenanceLog;
#[cfg(test)]
pub use maintenance_repository::MockMaintenanceRepository;
pub use maintenance_repository::{MaintenancePersistenceError, MaintenanceRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::StatsQuery;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
pub use stats_repository::{StatsRepository, StatsRepositoryError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
