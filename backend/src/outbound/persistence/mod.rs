//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and hold no
//! business rules. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use bitacora::outbound::persistence::{DbPool, DieselEquipmentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bitacora")).await?;
//! let equipment = DieselEquipmentRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_equipment_repository;
mod diesel_helpers;
mod diesel_maintenance_repository;
mod diesel_stats_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_equipment_repository::DieselEquipmentRepository;
pub use diesel_maintenance_repository::DieselMaintenanceRepository;
pub use diesel_stats_repository::DieselStatsRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
