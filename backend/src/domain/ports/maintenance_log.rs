//! Driving port for the maintenance log.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    CreateOutcome, EquipmentId, Error, FileUpload, Identity, MaintenanceChanges, MaintenanceDraft,
    MaintenanceId, MaintenanceRecord, MaintenanceView,
};

/// Maintenance record use-cases.
///
/// Mutations that touch an existing record take the caller's identity:
/// only its author or an administrator may change it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceLog: Send + Sync {
    /// Log maintenance on active equipment with the caller as author.
    async fn record(
        &self,
        author: &Identity,
        draft: MaintenanceDraft,
        evidence: Option<FileUpload>,
    ) -> Result<CreateOutcome<MaintenanceRecord>, Error>;

    /// Active record with author, equipment, and a fresh evidence link.
    async fn find(&self, id: &MaintenanceId) -> Result<Option<MaintenanceView>, Error>;

    /// Page through the active records of one equipment item.
    async fn list_for_equipment(
        &self,
        equipment_id: &EquipmentId,
        page: PageRequest,
    ) -> Result<Page<MaintenanceView>, Error>;

    /// Update fields and optionally replace the evidence.
    async fn update(
        &self,
        caller: &Identity,
        id: &MaintenanceId,
        changes: MaintenanceChanges,
        evidence: Option<FileUpload>,
    ) -> Result<MaintenanceRecord, Error>;

    /// Delete the evidence and clear its reference.
    async fn remove_evidence(
        &self,
        caller: &Identity,
        id: &MaintenanceId,
    ) -> Result<MaintenanceRecord, Error>;

    /// Soft-delete the record and discard its evidence.
    async fn deactivate(&self, id: &MaintenanceId) -> Result<(), Error>;
}
