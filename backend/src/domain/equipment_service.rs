//! Equipment inventory lifecycle.
//!
//! Rows and their manuals live in separate stores with no transaction
//! spanning both. Every operation orders its calls so that a row never
//! points at an object that was never written, and a superseded object is
//! only deleted after the row stops referencing it. File deletions are
//! best-effort: failures are logged and left for manual cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use crate::domain::ports::{
    EquipmentPersistenceError, EquipmentRegistry, EquipmentRepository, FileStore,
};
use crate::domain::service_support::{
    conflict_on, discard_file, map_file_store_error, no_file_attached, outage_or_internal,
    signed_link,
};
use crate::domain::{
    AttachmentStatus, CreateOutcome, Equipment, EquipmentChanges, EquipmentDraft, EquipmentId,
    EquipmentPatch, EquipmentView, Error, FileKey, FileUpload, RecordStatus, SearchTerm,
};

/// Implements [`EquipmentRegistry`] over an entity store and a file store.
#[derive(Clone)]
pub struct EquipmentService<E, F> {
    equipment: Arc<E>,
    files: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<E, F> EquipmentService<E, F> {
    /// Create a new service with the given adapters.
    pub fn new(equipment: Arc<E>, files: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            equipment,
            files,
            clock,
        }
    }
}

fn map_equipment_error(error: EquipmentPersistenceError) -> Error {
    match error {
        EquipmentPersistenceError::Conflict { field } => conflict_on(&field),
        other => outage_or_internal(&other, other.is_unavailable()),
    }
}

fn equipment_not_found() -> Error {
    Error::not_found("equipment not found")
}

fn outcome(record: Equipment, attachment: AttachmentStatus) -> CreateOutcome<Equipment> {
    CreateOutcome { record, attachment }
}

impl<E, F> EquipmentService<E, F>
where
    E: EquipmentRepository,
    F: FileStore,
{
    async fn find_active(&self, id: &EquipmentId) -> Result<Equipment, Error> {
        self.equipment
            .find_by_id(id)
            .await
            .map_err(map_equipment_error)?
            .filter(|equipment| equipment.status.is_active())
            .ok_or_else(equipment_not_found)
    }

    async fn attach_new_manual(
        &self,
        equipment: Equipment,
        upload: FileUpload,
        description: Option<String>,
    ) -> CreateOutcome<Equipment> {
        let key = FileKey::for_new_manual(&equipment.id, &upload);
        if let Err(error) = self
            .files
            .put(&key, upload.bytes(), upload.content_type())
            .await
        {
            warn!(equipment_id = %equipment.id, %error, "manual upload failed; equipment kept without manual");
            return outcome(equipment, AttachmentStatus::UploadFailed);
        }

        let patch = EquipmentPatch {
            changes: EquipmentChanges {
                manual_description: description,
                ..EquipmentChanges::default()
            },
            manual_key: Some(key.clone()),
        };
        match self.equipment.update(&equipment.id, &patch).await {
            Ok(Some(updated)) => outcome(updated, AttachmentStatus::Stored),
            Ok(None) => {
                warn!(equipment_id = %equipment.id, "equipment vanished before manual was linked");
                discard_file(self.files.as_ref(), &key, "unlinked manual").await;
                outcome(equipment, AttachmentStatus::UploadFailed)
            }
            Err(error) => {
                warn!(equipment_id = %equipment.id, %error, "failed to link uploaded manual");
                discard_file(self.files.as_ref(), &key, "unlinked manual").await;
                outcome(equipment, AttachmentStatus::UploadFailed)
            }
        }
    }
}

#[async_trait]
impl<E, F> EquipmentRegistry for EquipmentService<E, F>
where
    E: EquipmentRepository,
    F: FileStore,
{
    async fn register(
        &self,
        draft: EquipmentDraft,
        manual: Option<FileUpload>,
    ) -> Result<CreateOutcome<Equipment>, Error> {
        let description = draft.manual_description.map(String::from);
        let equipment = Equipment {
            id: EquipmentId::random(),
            name: draft.name.into_inner(),
            brand: draft.brand.into_inner(),
            model: draft.model.into_inner(),
            serial_number: draft.serial_number.into_inner(),
            control_id: draft.control_id.into_inner(),
            location: draft.location.into_inner(),
            status: RecordStatus::Activo,
            manual_key: None,
            manual_description: None,
            created_at: self.clock.utc(),
        };
        self.equipment
            .insert(&equipment)
            .await
            .map_err(map_equipment_error)?;
        info!(equipment_id = %equipment.id, "equipment registered");

        Ok(match manual {
            Some(upload) => self.attach_new_manual(equipment, upload, description).await,
            None => outcome(equipment, AttachmentStatus::NotProvided),
        })
    }

    async fn find(&self, id: &EquipmentId) -> Result<Option<EquipmentView>, Error> {
        let Some(equipment) = self
            .equipment
            .find_by_id(id)
            .await
            .map_err(map_equipment_error)?
            .filter(|equipment| equipment.status.is_active())
        else {
            return Ok(None);
        };
        let manual_url = signed_link(
            self.files.as_ref(),
            equipment.manual_key.as_ref(),
            self.clock.utc(),
        )
        .await;
        Ok(Some(EquipmentView {
            equipment,
            manual_url,
        }))
    }

    async fn list(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<Equipment>, Error> {
        self.equipment
            .list_active(search, page)
            .await
            .map_err(map_equipment_error)
    }

    async fn update(
        &self,
        id: &EquipmentId,
        changes: EquipmentChanges,
        manual: Option<FileUpload>,
    ) -> Result<Equipment, Error> {
        let current = self.find_active(id).await?;

        let replacement = match manual {
            Some(upload) => {
                let millis = self.clock.utc().timestamp_millis();
                let key = FileKey::for_replacement_manual(id, millis, &upload);
                self.files
                    .put(&key, upload.bytes(), upload.content_type())
                    .await
                    .map_err(map_file_store_error)?;
                Some(key)
            }
            None => None,
        };

        let patch = EquipmentPatch {
            changes,
            manual_key: replacement.clone(),
        };
        let updated = match self.equipment.update(id, &patch).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                if let Some(key) = &replacement {
                    discard_file(self.files.as_ref(), key, "rejected manual replacement").await;
                }
                return Err(equipment_not_found());
            }
            Err(error) => {
                if let Some(key) = &replacement {
                    discard_file(self.files.as_ref(), key, "rejected manual replacement").await;
                }
                return Err(map_equipment_error(error));
            }
        };

        if let (Some(new_key), Some(old_key)) = (&replacement, &current.manual_key) {
            if new_key != old_key {
                discard_file(self.files.as_ref(), old_key, "superseded manual").await;
            }
        }
        Ok(updated)
    }

    async fn remove_manual(&self, id: &EquipmentId) -> Result<Equipment, Error> {
        let current = self.find_active(id).await?;
        let Some(key) = current.manual_key else {
            return Err(no_file_attached("equipment has no manual to remove"));
        };

        let updated = self
            .equipment
            .clear_manual(id)
            .await
            .map_err(map_equipment_error)?
            .ok_or_else(equipment_not_found)?;
        discard_file(self.files.as_ref(), &key, "manual removed").await;
        info!(equipment_id = %id, "manual removed");
        Ok(updated)
    }

    async fn deactivate(&self, id: &EquipmentId) -> Result<(), Error> {
        let current = self.find_active(id).await?;
        let deactivated = self
            .equipment
            .deactivate(id)
            .await
            .map_err(map_equipment_error)?;
        if !deactivated {
            return Err(equipment_not_found());
        }
        info!(equipment_id = %id, "equipment deactivated");

        if let Some(key) = &current.manual_key {
            discard_file(self.files.as_ref(), key, "equipment deactivated").await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "equipment_service_tests.rs"]
mod tests;
