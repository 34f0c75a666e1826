//! PostgreSQL-backed `MaintenanceRepository` adapter.
//!
//! Detail reads join each record with its parent equipment and its author so
//! a page of the log is answered by one query plus a count.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{MaintenancePersistenceError, MaintenanceRepository};
use crate::domain::{
    EquipmentId, EquipmentSummary, FileKey, MaintenanceDetails, MaintenanceId, MaintenancePatch,
    MaintenanceRecord, RecordStatus, UserId,
};

use super::diesel_basic_error_mapping::{DbFailure, map_basic_pool_error};
use super::diesel_helpers::{count_to_u64, decode_column, page_limit, page_offset};
use super::models::{MaintenanceRow, MaintenanceUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{equipment, maintenance_records, users};

const ACTIVE: &str = RecordStatus::Activo.as_str();

type DetailsRow = (MaintenanceRow, String, String, String);

/// Diesel-backed implementation of [`MaintenanceRepository`].
#[derive(Clone)]
pub struct DieselMaintenanceRepository {
    pool: DbPool,
}

impl DieselMaintenanceRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MaintenancePersistenceError {
    map_basic_pool_error(&error, MaintenancePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MaintenancePersistenceError {
    match DbFailure::from(error) {
        DbFailure::ForeignKey(constraint) if constraint.contains("equipment_id") => {
            MaintenancePersistenceError::missing_reference("equipment")
        }
        DbFailure::ForeignKey(constraint) if constraint.contains("author_id") => {
            MaintenancePersistenceError::missing_reference("author")
        }
        other => other.resolve(
            MaintenancePersistenceError::query,
            MaintenancePersistenceError::connection,
        ),
    }
}

fn row_to_record(
    row: MaintenanceRow,
) -> Result<MaintenanceRecord, MaintenancePersistenceError> {
    let evidence_key = row
        .evidence_key
        .as_deref()
        .map(|raw| decode_column("evidence_key", raw, |raw| FileKey::new(raw)))
        .transpose()
        .map_err(MaintenancePersistenceError::query)?;
    Ok(MaintenanceRecord {
        id: MaintenanceId::from_uuid(row.id),
        equipment_id: EquipmentId::from_uuid(row.equipment_id),
        maintenance_type: row.maintenance_type,
        performed_on: row.performed_on,
        observations: row.observations,
        author_id: UserId::from_uuid(row.author_id),
        evidence_key,
        next_due: row.next_due,
        status: decode_column("status", &row.status, str::parse::<RecordStatus>)
            .map_err(MaintenancePersistenceError::query)?,
        created_at: row.created_at,
    })
}

fn details_from_row(
    (row, equipment_name, equipment_model, author_name): DetailsRow,
) -> Result<MaintenanceDetails, MaintenancePersistenceError> {
    let record = row_to_record(row)?;
    Ok(MaintenanceDetails {
        equipment: EquipmentSummary {
            id: record.equipment_id,
            name: equipment_name,
            model: equipment_model,
        },
        author_name,
        record,
    })
}

fn to_row(record: &MaintenanceRecord) -> MaintenanceRow {
    MaintenanceRow {
        id: *record.id.as_uuid(),
        equipment_id: *record.equipment_id.as_uuid(),
        maintenance_type: record.maintenance_type.clone(),
        performed_on: record.performed_on,
        observations: record.observations.clone(),
        author_id: *record.author_id.as_uuid(),
        evidence_key: record.evidence_key.as_ref().map(|key| key.as_str().to_owned()),
        next_due: record.next_due,
        status: record.status.as_str().to_owned(),
        created_at: record.created_at,
    }
}

fn to_changeset(patch: &MaintenancePatch) -> MaintenanceUpdate<'_> {
    let changes = &patch.changes;
    MaintenanceUpdate {
        maintenance_type: changes.maintenance_type.as_ref().map(|text| text.as_str()),
        performed_on: changes.performed_on,
        observations: changes.observations.as_ref().map(|text| text.as_str()),
        evidence_key: patch.evidence_key.as_ref().map(FileKey::as_str),
        next_due: changes.next_due,
    }
}

impl DieselMaintenanceRepository {
    async fn find_active(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = maintenance_records::table
            .filter(maintenance_records::id.eq(id.as_uuid()))
            .filter(maintenance_records::status.eq(ACTIVE))
            .select(MaintenanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }
}

#[async_trait]
impl MaintenanceRepository for DieselMaintenanceRepository {
    async fn insert(&self, record: &MaintenanceRecord) -> Result<(), MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(maintenance_records::table)
            .values(&to_row(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = maintenance_records::table
            .filter(maintenance_records::id.eq(id.as_uuid()))
            .select(MaintenanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn find_details(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceDetails>, MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = maintenance_records::table
            .inner_join(equipment::table)
            .inner_join(users::table)
            .filter(maintenance_records::id.eq(id.as_uuid()))
            .filter(maintenance_records::status.eq(ACTIVE))
            .select((
                MaintenanceRow::as_select(),
                equipment::name,
                equipment::model,
                users::display_name,
            ))
            .first::<DetailsRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(details_from_row).transpose()
    }

    async fn list_active_by_equipment(
        &self,
        equipment_id: &EquipmentId,
        page: PageRequest,
    ) -> Result<Page<MaintenanceDetails>, MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total = maintenance_records::table
            .filter(maintenance_records::equipment_id.eq(equipment_id.as_uuid()))
            .filter(maintenance_records::status.eq(ACTIVE))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = maintenance_records::table
            .inner_join(equipment::table)
            .inner_join(users::table)
            .filter(maintenance_records::equipment_id.eq(equipment_id.as_uuid()))
            .filter(maintenance_records::status.eq(ACTIVE))
            .order((
                maintenance_records::performed_on.desc(),
                maintenance_records::created_at.desc(),
            ))
            .select((
                MaintenanceRow::as_select(),
                equipment::name,
                equipment::model,
                users::display_name,
            ))
            .limit(page_limit(page))
            .offset(page_offset(page))
            .load::<DetailsRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let data = rows
            .into_iter()
            .map(details_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(data, count_to_u64(total), page))
    }

    async fn update(
        &self,
        id: &MaintenanceId,
        patch: &MaintenancePatch,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let changes = to_changeset(patch);
        if changes.is_empty() {
            return self.find_active(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            maintenance_records::table
                .filter(maintenance_records::id.eq(id.as_uuid()))
                .filter(maintenance_records::status.eq(ACTIVE)),
        )
        .set(&changes)
        .returning(MaintenanceRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn clear_evidence(
        &self,
        id: &MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            maintenance_records::table
                .filter(maintenance_records::id.eq(id.as_uuid()))
                .filter(maintenance_records::status.eq(ACTIVE)),
        )
        .set(maintenance_records::evidence_key.eq(None::<String>))
        .returning(MaintenanceRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn deactivate(&self, id: &MaintenanceId) -> Result<bool, MaintenancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = diesel::update(
            maintenance_records::table
                .filter(maintenance_records::id.eq(id.as_uuid()))
                .filter(maintenance_records::status.eq(ACTIVE)),
        )
        .set((
            maintenance_records::status.eq(RecordStatus::Inactivo.as_str()),
            maintenance_records::evidence_key.eq(None::<String>),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(touched > 0)
    }
}
