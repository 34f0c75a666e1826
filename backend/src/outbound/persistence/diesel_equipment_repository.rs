//! PostgreSQL-backed `EquipmentRepository` adapter.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{EquipmentPersistenceError, EquipmentRepository};
use crate::domain::{Equipment, EquipmentId, EquipmentPatch, FileKey, RecordStatus, SearchTerm};

use super::diesel_basic_error_mapping::{DbFailure, map_basic_pool_error};
use super::diesel_helpers::{count_to_u64, decode_column, page_limit, page_offset};
use super::models::{EquipmentRow, EquipmentUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::equipment;

const SERIAL_CONSTRAINT: &str = "equipment_serial_number_key";
const ACTIVE: &str = RecordStatus::Activo.as_str();

type EquipmentFilter = Box<dyn BoxableExpression<equipment::table, Pg, SqlType = Bool>>;

/// Diesel-backed implementation of [`EquipmentRepository`].
#[derive(Clone)]
pub struct DieselEquipmentRepository {
    pool: DbPool,
}

impl DieselEquipmentRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EquipmentPersistenceError {
    map_basic_pool_error(&error, EquipmentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EquipmentPersistenceError {
    match DbFailure::from(error) {
        DbFailure::Unique(constraint) if constraint == SERIAL_CONSTRAINT => {
            EquipmentPersistenceError::conflict("serial_number")
        }
        other => other.resolve(
            EquipmentPersistenceError::query,
            EquipmentPersistenceError::connection,
        ),
    }
}

fn row_to_equipment(row: EquipmentRow) -> Result<Equipment, EquipmentPersistenceError> {
    let manual_key = row
        .manual_key
        .as_deref()
        .map(|raw| decode_column("manual_key", raw, |raw| FileKey::new(raw)))
        .transpose()
        .map_err(EquipmentPersistenceError::query)?;
    Ok(Equipment {
        id: EquipmentId::from_uuid(row.id),
        name: row.name,
        brand: row.brand,
        model: row.model,
        serial_number: row.serial_number,
        control_id: row.control_id,
        location: row.location,
        status: decode_column("status", &row.status, str::parse::<RecordStatus>)
            .map_err(EquipmentPersistenceError::query)?,
        manual_key,
        manual_description: row.manual_description,
        created_at: row.created_at,
    })
}

fn to_row(item: &Equipment) -> EquipmentRow {
    EquipmentRow {
        id: *item.id.as_uuid(),
        name: item.name.clone(),
        brand: item.brand.clone(),
        model: item.model.clone(),
        serial_number: item.serial_number.clone(),
        control_id: item.control_id.clone(),
        location: item.location.clone(),
        status: item.status.as_str().to_owned(),
        manual_key: item.manual_key.as_ref().map(|key| key.as_str().to_owned()),
        manual_description: item.manual_description.clone(),
        created_at: item.created_at,
    }
}

fn to_changeset(patch: &EquipmentPatch) -> EquipmentUpdate<'_> {
    let changes = &patch.changes;
    EquipmentUpdate {
        name: changes.name.as_ref().map(|text| text.as_str()),
        brand: changes.brand.as_ref().map(|text| text.as_str()),
        model: changes.model.as_ref().map(|text| text.as_str()),
        serial_number: changes.serial_number.as_ref().map(|text| text.as_str()),
        control_id: changes.control_id.as_ref().map(|text| text.as_str()),
        location: changes.location.as_ref().map(|text| text.as_str()),
        manual_key: patch.manual_key.as_ref().map(FileKey::as_str),
        manual_description: changes.manual_description.as_deref(),
    }
}

fn search_filter(term: &SearchTerm) -> EquipmentFilter {
    let pattern = term.like_pattern();
    Box::new(
        equipment::name
            .ilike(pattern.clone())
            .or(equipment::brand.ilike(pattern.clone()))
            .or(equipment::model.ilike(pattern.clone()))
            .or(equipment::serial_number.ilike(pattern.clone()))
            .or(equipment::control_id.ilike(pattern.clone()))
            .or(equipment::location.ilike(pattern)),
    )
}

impl DieselEquipmentRepository {
    async fn find_active(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = equipment::table
            .filter(equipment::id.eq(id.as_uuid()))
            .filter(equipment::status.eq(ACTIVE))
            .select(EquipmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_equipment).transpose()
    }
}

#[async_trait]
impl EquipmentRepository for DieselEquipmentRepository {
    async fn insert(&self, item: &Equipment) -> Result<(), EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(equipment::table)
            .values(&to_row(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = equipment::table
            .filter(equipment::id.eq(id.as_uuid()))
            .select(EquipmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_equipment).transpose()
    }

    async fn list_active(
        &self,
        search: Option<SearchTerm>,
        page: PageRequest,
    ) -> Result<Page<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = equipment::table
            .select(diesel::dsl::count_star())
            .filter(equipment::status.eq(ACTIVE))
            .into_boxed();
        let mut rows_query = equipment::table
            .select(EquipmentRow::as_select())
            .filter(equipment::status.eq(ACTIVE))
            .order((equipment::created_at.desc(), equipment::id.desc()))
            .into_boxed();
        if let Some(term) = &search {
            count_query = count_query.filter(search_filter(term));
            rows_query = rows_query.filter(search_filter(term));
        }

        let total = count_query
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = rows_query
            .limit(page_limit(page))
            .offset(page_offset(page))
            .load::<EquipmentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let data = rows
            .into_iter()
            .map(row_to_equipment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(data, count_to_u64(total), page)
            .with_search(search.map(|term| term.as_str().to_owned())))
    }

    async fn update(
        &self,
        id: &EquipmentId,
        patch: &EquipmentPatch,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let changes = to_changeset(patch);
        if changes.is_empty() {
            return self.find_active(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            equipment::table
                .filter(equipment::id.eq(id.as_uuid()))
                .filter(equipment::status.eq(ACTIVE)),
        )
        .set(&changes)
        .returning(EquipmentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_equipment).transpose()
    }

    async fn clear_manual(
        &self,
        id: &EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            equipment::table
                .filter(equipment::id.eq(id.as_uuid()))
                .filter(equipment::status.eq(ACTIVE)),
        )
        .set((
            equipment::manual_key.eq(None::<String>),
            equipment::manual_description.eq(None::<String>),
        ))
        .returning(EquipmentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_equipment).transpose()
    }

    async fn deactivate(&self, id: &EquipmentId) -> Result<bool, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = diesel::update(
            equipment::table
                .filter(equipment::id.eq(id.as_uuid()))
                .filter(equipment::status.eq(ACTIVE)),
        )
        .set((
            equipment::status.eq(RecordStatus::Inactivo.as_str()),
            equipment::manual_key.eq(None::<String>),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(touched > 0)
    }
}
