//! Port abstraction for equipment persistence.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Equipment, EquipmentId, EquipmentPatch, SearchTerm};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by equipment repository adapters.
    pub enum EquipmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "equipment repository connection failed: {message}"; unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "equipment repository query failed: {message}",
        /// A unique column already holds the submitted value.
        Conflict { field: String } => "equipment repository uniqueness violated on {field}",
    }
}

/// Equipment storage.
///
/// Every mutation only touches rows that are still `ACTIVO`; once a row is
/// soft-deleted the repository treats it as absent for writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    /// Insert a new row.
    async fn insert(&self, equipment: &Equipment) -> Result<(), EquipmentPersistenceError>;

    /// Fetch a row in any status.
    async fn find_by_id(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError>;

    /// Page through active rows, newest first, filtered by `search` over the
    /// name, brand, model, serial number, control id, and location.
    async fn list_active(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<Equipment>, EquipmentPersistenceError>;

    /// Apply a patch to an active row.
    async fn update(
        &self,
        id: &EquipmentId,
        patch: &EquipmentPatch,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError>;

    /// Clear the manual key and description of an active row.
    async fn clear_manual(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError>;

    /// Mark an active row `INACTIVO` and drop its manual reference.
    ///
    /// Returns `false` when no active row matched.
    async fn deactivate(&self, id: &EquipmentId) -> Result<bool, EquipmentPersistenceError>;
}
