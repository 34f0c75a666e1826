//! Port abstraction for maintenance log persistence.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    EquipmentId, MaintenanceDetails, MaintenanceId, MaintenancePatch, MaintenanceRecord,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by maintenance repository adapters.
    pub enum MaintenancePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "maintenance repository connection failed: {message}"; unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "maintenance repository query failed: {message}",
        /// A referenced equipment or author row does not exist.
        MissingReference { field: String } => "maintenance references a missing {field}",
    }
}

/// Maintenance record storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: &MaintenanceRecord) -> Result<(), MaintenancePersistenceError>;

    /// Fetch a bare record in any status.
    async fn find_by_id(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError>;

    /// Fetch an active record joined with its author and equipment.
    async fn find_details(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceDetails>, MaintenancePersistenceError>;

    /// Page through the active records of one equipment item, most recently
    /// performed first.
    async fn list_active_by_equipment(
        &self,
        equipment_id: &EquipmentId,
        page: PageRequest,
    ) -> Result<Page<MaintenanceDetails>, MaintenancePersistenceError>;

    /// Apply a patch to an active record.
    async fn update(
        &self,
        id: &MaintenanceId,
        patch: &MaintenancePatch,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError>;

    /// Clear the evidence key of an active record.
    async fn clear_evidence(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError>;

    /// Mark an active record `INACTIVO` and drop its evidence reference.
    ///
    /// Returns `false` when no active record matched.
    async fn deactivate(&self, id: &MaintenanceId) -> Result<bool, MaintenancePersistenceError>;
}
