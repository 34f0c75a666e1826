//! Driving port for the equipment inventory.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    CreateOutcome, Equipment, EquipmentChanges, EquipmentDraft, EquipmentId, EquipmentView,
    Error, FileUpload, SearchTerm,
};

/// Equipment lifecycle use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRegistry: Send + Sync {
    /// Register equipment, optionally with its manual.
    ///
    /// The row is created first. A manual that fails to upload does not undo
    /// the row; the outcome reports it instead.
    async fn register(
        &self,
        draft: EquipmentDraft,
        manual: Option<FileUpload>,
    ) -> Result<CreateOutcome<Equipment>, Error>;

    /// Active equipment with a fresh manual link; `None` when absent or
    /// inactive.
    async fn find(&self, id: &EquipmentId) -> Result<Option<EquipmentView>, Error>;

    /// Page through active equipment, newest first.
    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<Equipment>, Error>;

    /// Update fields and optionally replace the manual.
    async fn update(
        &self,
        id: &EquipmentId,
        changes: EquipmentChanges,
        manual: Option<FileUpload>,
    ) -> Result<Equipment, Error>;

    /// Delete the manual and clear its reference.
    async fn remove_manual(&self, id: &EquipmentId) -> Result<Equipment, Error>;

    /// Soft-delete the equipment and discard its manual.
    async fn deactivate(&self, id: &EquipmentId) -> Result<(), Error>;
}
