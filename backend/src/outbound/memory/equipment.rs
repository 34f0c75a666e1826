//! In-memory [`EquipmentRepository`].

use std::cmp::Reverse;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{EquipmentPersistenceError, EquipmentRepository};
use crate::domain::{Equipment, EquipmentId, EquipmentPatch, RecordStatus, SearchTerm};

use super::{SharedTables, paginate};

/// Equipment table held in process memory.
#[derive(Clone)]
pub struct InMemoryEquipmentRepository {
    tables: SharedTables,
}

impl InMemoryEquipmentRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

fn matches_search(item: &Equipment, term: &SearchTerm) -> bool {
    [
        &item.name,
        &item.brand,
        &item.model,
        &item.serial_number,
        &item.control_id,
        &item.location,
    ]
    .into_iter()
    .any(|field| term.matches(field))
}

fn apply_patch(item: &mut Equipment, patch: &EquipmentPatch) {
    let changes = &patch.changes;
    let fields = [
        (&mut item.name, &changes.name),
        (&mut item.brand, &changes.brand),
        (&mut item.model, &changes.model),
        (&mut item.serial_number, &changes.serial_number),
        (&mut item.control_id, &changes.control_id),
        (&mut item.location, &changes.location),
    ];
    for (field, change) in fields {
        if let Some(value) = change {
            *field = value.as_str().to_owned();
        }
    }
    if let Some(description) = &changes.manual_description {
        item.manual_description = Some(description.clone());
    }
    if let Some(key) = &patch.manual_key {
        item.manual_key = Some(key.clone());
    }
}

#[async_trait]
impl EquipmentRepository for InMemoryEquipmentRepository {
    async fn insert(&self, item: &Equipment) -> Result<(), EquipmentPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .equipment
            .values()
            .any(|existing| existing.serial_number == item.serial_number)
        {
            return Err(EquipmentPersistenceError::conflict("serial_number"));
        }
        tables.equipment.insert(item.id, item.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.equipment.get(id).cloned())
    }

    async fn list_active(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<Equipment>, EquipmentPersistenceError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Equipment> = tables
            .equipment
            .values()
            .filter(|item| item.status.is_active())
            .filter(|item| search.as_ref().is_none_or(|term| matches_search(item, term)))
            .cloned()
            .collect();
        rows.sort_by_key(|item| Reverse((item.created_at, item.id)));
        Ok(paginate(rows, page).with_search(search.map(|term| term.as_str().to_owned())))
    }

    async fn update(
        &self,
        id: &EquipmentId,
        patch: &EquipmentPatch,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut tables = self.tables.write().await;
        if let Some(serial) = &patch.changes.serial_number {
            let taken = tables
                .equipment
                .values()
                .any(|other| other.id != *id && other.serial_number == serial.as_str());
            if taken {
                return Err(EquipmentPersistenceError::conflict("serial_number"));
            }
        }
        Ok(tables
            .equipment
            .get_mut(id)
            .filter(|item| item.status.is_active())
            .map(|item| {
                apply_patch(item, patch);
                item.clone()
            }))
    }

    async fn clear_manual(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .equipment
            .get_mut(id)
            .filter(|item| item.status.is_active())
            .map(|item| {
                item.manual_key = None;
                item.manual_description = None;
                item.clone()
            }))
    }

    async fn deactivate(&self, id: &EquipmentId) -> Result<bool, EquipmentPersistenceError> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables
            .equipment
            .get_mut(id)
            .filter(|item| item.status.is_active())
        else {
            return Ok(false);
        };
        item.status = RecordStatus::Inactivo;
        item.manual_key = None;
        Ok(true)
    }
}
