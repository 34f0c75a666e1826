//! Maintenance log lifecycle.
//!
//! Follows the same row-then-file ordering as the equipment service, and
//! additionally restricts edits of an existing record to its author or an
//! administrator. The ownership check runs before anything is uploaded.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use crate::domain::authorization::require_owner_or_admin;
use crate::domain::ports::{
    EquipmentPersistenceError, EquipmentRepository, FileStore, MaintenanceLog,
    MaintenancePersistenceError, MaintenanceRepository,
};
use crate::domain::service_support::{
    discard_file, map_file_store_error, no_file_attached, outage_or_internal, signed_link,
};
use crate::domain::{
    AttachmentStatus, CreateOutcome, EquipmentId, Error, FileKey, FileUpload, Identity,
    MaintenanceChanges, MaintenanceDraft, MaintenanceId, MaintenancePatch, MaintenanceRecord,
    MaintenanceView, RecordStatus,
};

/// Implements [`MaintenanceLog`] over the record, equipment, and file stores.
#[derive(Clone)]
pub struct MaintenanceService<M, E, F> {
    records: Arc<M>,
    equipment: Arc<E>,
    files: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<M, E, F> MaintenanceService<M, E, F> {
    /// Create a new service with the given adapters.
    pub fn new(records: Arc<M>, equipment: Arc<E>, files: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            equipment,
            files,
            clock,
        }
    }
}

fn map_record_error(error: MaintenancePersistenceError) -> Error {
    match error {
        MaintenancePersistenceError::MissingReference { field } => {
            Error::not_found(format!("{field} not found"))
        }
        other => outage_or_internal(&other, other.is_unavailable()),
    }
}

fn map_equipment_error(error: EquipmentPersistenceError) -> Error {
    outage_or_internal(&error, error.is_unavailable())
}

fn record_not_found() -> Error {
    Error::not_found("maintenance record not found")
}

fn outcome(
    record: MaintenanceRecord,
    attachment: AttachmentStatus,
) -> CreateOutcome<MaintenanceRecord> {
    CreateOutcome { record, attachment }
}

impl<M, E, F> MaintenanceService<M, E, F>
where
    M: MaintenanceRepository,
    E: EquipmentRepository,
    F: FileStore,
{
    async fn find_active(&self, id: &MaintenanceId) -> Result<MaintenanceRecord, Error> {
        self.records
            .find_by_id(id)
            .await
            .map_err(map_record_error)?
            .filter(|record| record.status.is_active())
            .ok_or_else(record_not_found)
    }

    async fn ensure_equipment_active(&self, id: &EquipmentId) -> Result<(), Error> {
        self.equipment
            .find_by_id(id)
            .await
            .map_err(map_equipment_error)?
            .filter(|equipment| equipment.status.is_active())
            .map(|_| ())
            .ok_or_else(|| Error::not_found("equipment not found"))
    }

    async fn attach_evidence(
        &self,
        record: MaintenanceRecord,
        upload: FileUpload,
    ) -> CreateOutcome<MaintenanceRecord> {
        let millis = self.clock.utc().timestamp_millis();
        let key = FileKey::for_evidence(&record.id, millis, &upload);
        if let Err(error) = self
            .files
            .put(&key, upload.bytes(), upload.content_type())
            .await
        {
            warn!(record_id = %record.id, %error, "evidence upload failed; record kept without evidence");
            return outcome(record, AttachmentStatus::UploadFailed);
        }

        let patch = MaintenancePatch {
            changes: MaintenanceChanges::default(),
            evidence_key: Some(key.clone()),
        };
        match self.records.update(&record.id, &patch).await {
            Ok(Some(updated)) => outcome(updated, AttachmentStatus::Stored),
            Ok(None) => {
                warn!(record_id = %record.id, "record vanished before evidence was linked");
                discard_file(self.files.as_ref(), &key, "unlinked evidence").await;
                outcome(record, AttachmentStatus::UploadFailed)
            }
            Err(error) => {
                warn!(record_id = %record.id, %error, "failed to link uploaded evidence");
                discard_file(self.files.as_ref(), &key, "unlinked evidence").await;
                outcome(record, AttachmentStatus::UploadFailed)
            }
        }
    }
}

#[async_trait]
impl<M, E, F> MaintenanceLog for MaintenanceService<M, E, F>
where
    M: MaintenanceRepository,
    E: EquipmentRepository,
    F: FileStore,
{
    async fn record(
        &self,
        author: &Identity,
        draft: MaintenanceDraft,
        evidence: Option<FileUpload>,
    ) -> Result<CreateOutcome<MaintenanceRecord>, Error> {
        self.ensure_equipment_active(&draft.equipment_id).await?;

        let record = MaintenanceRecord {
            id: MaintenanceId::random(),
            equipment_id: draft.equipment_id,
            maintenance_type: draft.maintenance_type.into_inner(),
            performed_on: draft.performed_on,
            observations: draft.observations.into_inner(),
            author_id: author.user_id,
            evidence_key: None,
            next_due: draft.next_due,
            status: RecordStatus::Activo,
            created_at: self.clock.utc(),
        };
        self.records
            .insert(&record)
            .await
            .map_err(map_record_error)?;
        info!(record_id = %record.id, equipment_id = %record.equipment_id, "maintenance logged");

        Ok(match evidence {
            Some(upload) => self.attach_evidence(record, upload).await,
            None => outcome(record, AttachmentStatus::NotProvided),
        })
    }

    async fn find(&self, id: &MaintenanceId) -> Result<Option<MaintenanceView>, Error> {
        let Some(details) = self
            .records
            .find_details(id)
            .await
            .map_err(map_record_error)?
        else {
            return Ok(None);
        };
        let evidence_url = signed_link(
            self.files.as_ref(),
            details.record.evidence_key.as_ref(),
            self.clock.utc(),
        )
        .await;
        Ok(Some(MaintenanceView {
            details,
            evidence_url,
        }))
    }

    async fn list_for_equipment(
        &self,
        equipment_id: &EquipmentId,
        page: PageRequest,
    ) -> Result<Page<MaintenanceView>, Error> {
        let listed = self
            .records
            .list_active_by_equipment(equipment_id, page)
            .await
            .map_err(map_record_error)?;

        let now = self.clock.utc();
        let mut links = Vec::with_capacity(listed.data().len());
        for details in listed.data() {
            links.push(
                signed_link(
                    self.files.as_ref(),
                    details.record.evidence_key.as_ref(),
                    now,
                )
                .await,
            );
        }
        let mut links = links.into_iter();
        Ok(listed.map(|details| MaintenanceView {
            details,
            evidence_url: links.next().flatten(),
        }))
    }

    async fn update(
        &self,
        caller: &Identity,
        id: &MaintenanceId,
        changes: MaintenanceChanges,
        evidence: Option<FileUpload>,
    ) -> Result<MaintenanceRecord, Error> {
        let current = self.find_active(id).await?;
        require_owner_or_admin(caller, &current.author_id)?;

        let replacement = match evidence {
            Some(upload) => {
                let millis = self.clock.utc().timestamp_millis();
                let key = FileKey::for_evidence(id, millis, &upload);
                self.files
                    .put(&key, upload.bytes(), upload.content_type())
                    .await
                    .map_err(map_file_store_error)?;
                Some(key)
            }
            None => None,
        };

        let patch = MaintenancePatch {
            changes,
            evidence_key: replacement.clone(),
        };
        let updated = match self.records.update(id, &patch).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                if let Some(key) = &replacement {
                    discard_file(self.files.as_ref(), key, "rejected evidence replacement").await;
                }
                return Err(record_not_found());
            }
            Err(error) => {
                if let Some(key) = &replacement {
                    discard_file(self.files.as_ref(), key, "rejected evidence replacement").await;
                }
                return Err(map_record_error(error));
            }
        };

        if let (Some(new_key), Some(old_key)) = (&replacement, &current.evidence_key) {
            if new_key != old_key {
                discard_file(self.files.as_ref(), old_key, "superseded evidence").await;
            }
        }
        Ok(updated)
    }

    async fn remove_evidence(
        &self,
        caller: &Identity,
        id: &MaintenanceId,
    ) -> Result<MaintenanceRecord, Error> {
        let current = self.find_active(id).await?;
        require_owner_or_admin(caller, &current.author_id)?;
        let Some(key) = current.evidence_key else {
            return Err(no_file_attached("maintenance record has no evidence to remove"));
        };

        let updated = self
            .records
            .clear_evidence(id)
            .await
            .map_err(map_record_error)?
            .ok_or_else(record_not_found)?;
        discard_file(self.files.as_ref(), &key, "evidence removed").await;
        info!(record_id = %id, "evidence removed");
        Ok(updated)
    }

    async fn deactivate(&self, id: &MaintenanceId) -> Result<(), Error> {
        let current = self.find_active(id).await?;
        let deactivated = self
            .records
            .deactivate(id)
            .await
            .map_err(map_record_error)?;
        if !deactivated {
            return Err(record_not_found());
        }
        info!(record_id = %id, "maintenance record deactivated");

        if let Some(key) = &current.evidence_key {
            discard_file(self.files.as_ref(), key, "record deactivated").await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "maintenance_service_tests.rs"]
mod tests;
