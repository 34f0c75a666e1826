//! In-memory [`MaintenanceRepository`].

use std::cmp::Reverse;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{MaintenancePersistenceError, MaintenanceRepository};
use crate::domain::{
    EquipmentId, EquipmentSummary, MaintenanceDetails, MaintenanceId, MaintenancePatch,
    MaintenanceRecord, RecordStatus,
};

use super::{SharedTables, Tables, paginate};

/// Maintenance table held in process memory.
#[derive(Clone)]
pub struct InMemoryMaintenanceRepository {
    tables: SharedTables,
}

impl InMemoryMaintenanceRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

/// Inner join with equipment and users; `None` when either side is gone.
pub(super) fn join_details(tables: &Tables, record: &MaintenanceRecord) -> Option<MaintenanceDetails> {
    let item = tables.equipment.get(&record.equipment_id)?;
    let (author, _) = tables.users.get(&record.author_id)?;
    Some(MaintenanceDetails {
        record: record.clone(),
        author_name: author.display_name.as_ref().to_owned(),
        equipment: EquipmentSummary::from(item),
    })
}

fn apply_patch(record: &mut MaintenanceRecord, patch: &MaintenancePatch) {
    let changes = &patch.changes;
    if let Some(kind) = &changes.maintenance_type {
        record.maintenance_type = kind.as_str().to_owned();
    }
    if let Some(performed_on) = changes.performed_on {
        record.performed_on = performed_on;
    }
    if let Some(observations) = &changes.observations {
        record.observations = observations.as_str().to_owned();
    }
    if let Some(next_due) = changes.next_due {
        record.next_due = next_due;
    }
    if let Some(key) = &patch.evidence_key {
        record.evidence_key = Some(key.clone());
    }
}

fn active_mut<'a>(
    tables: &'a mut Tables,
    id: &MaintenanceId,
) -> Option<&'a mut MaintenanceRecord> {
    tables
        .maintenance
        .get_mut(id)
        .filter(|record| record.status.is_active())
}

#[async_trait]
impl MaintenanceRepository for InMemoryMaintenanceRepository {
    async fn insert(&self, record: &MaintenanceRecord) -> Result<(), MaintenancePersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.equipment.contains_key(&record.equipment_id) {
            return Err(MaintenancePersistenceError::missing_reference("equipment"));
        }
        if !tables.users.contains_key(&record.author_id) {
            return Err(MaintenancePersistenceError::missing_reference("author"));
        }
        tables.maintenance.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.maintenance.get(id).cloned())
    }

    async fn find_details(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceDetails>, MaintenancePersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .maintenance
            .get(id)
            .filter(|record| record.status.is_active())
            .and_then(|record| join_details(&tables, record)))
    }

    async fn list_active_by_equipment(
        &self,
        equipment_id: &EquipmentId,
        page: PageRequest,
    ) -> Result<Page<MaintenanceDetails>, MaintenancePersistenceError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<MaintenanceDetails> = tables
            .maintenance
            .values()
            .filter(|record| record.equipment_id == *equipment_id && record.status.is_active())
            .filter_map(|record| join_details(&tables, record))
            .collect();
        rows.sort_by_key(|details| {
            Reverse((details.record.performed_on, details.record.created_at))
        });
        Ok(paginate(rows, page))
    }

    async fn update(
        &self,
        id: &MaintenanceId,
        patch: &MaintenancePatch,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(active_mut(&mut tables, id).map(|record| {
            apply_patch(record, patch);
            record.clone()
        }))
    }

    async fn clear_evidence(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(active_mut(&mut tables, id).map(|record| {
            record.evidence_key = None;
            record.clone()
        }))
    }

    async fn deactivate(&self, id: &MaintenanceId) -> Result<bool, MaintenancePersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(active_mut(&mut tables, id)
            .map(|record| {
                record.status = RecordStatus::Inactivo;
                record.evidence_key = None;
            })
            .is_some())
    }
}
