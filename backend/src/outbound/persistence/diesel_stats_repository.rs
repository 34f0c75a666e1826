//! PostgreSQL-backed dashboard counters.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{StatsRepository, StatsRepositoryError};
use crate::domain::{
    EquipmentId, EquipmentOverview, EquipmentSummary, MaintenanceId, RecentMaintenance,
    RecordStatus, StatsWindow, SystemStats, UpcomingMaintenance,
};

use super::diesel_basic_error_mapping::{DbFailure, map_basic_pool_error};
use super::diesel_helpers::count_to_u64;
use super::pool::{DbPool, PoolError};
use super::schema::{equipment, maintenance_records, users};

const ACTIVE: &str = RecordStatus::Activo.as_str();

/// Diesel-backed implementation of [`StatsRepository`].
#[derive(Clone)]
pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StatsRepositoryError {
    map_basic_pool_error(&error, StatsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StatsRepositoryError {
    DbFailure::from(error).resolve(StatsRepositoryError::query, StatsRepositoryError::connection)
}

async fn upcoming_count(
    conn: &mut AsyncPgConnection,
    window: StatsWindow,
) -> Result<i64, diesel::result::Error> {
    maintenance_records::table
        .filter(maintenance_records::status.eq(ACTIVE))
        .filter(maintenance_records::next_due.ge(window.now))
        .filter(maintenance_records::next_due.le(window.upcoming_until))
        .count()
        .get_result(conn)
        .await
}

type UpcomingRow = (Uuid, Uuid, String, String, String, Option<DateTime<Utc>>, String);

fn upcoming_from_row(
    (record_id, equipment_id, name, model, maintenance_type, next_due, author_name): UpcomingRow,
) -> Option<UpcomingMaintenance> {
    Some(UpcomingMaintenance {
        record_id: MaintenanceId::from_uuid(record_id),
        equipment: EquipmentSummary {
            id: EquipmentId::from_uuid(equipment_id),
            name,
            model,
        },
        maintenance_type,
        next_due: next_due?,
        author_name,
    })
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

type OverviewRow = (Uuid, String, String, String, String);
type ActivityRow = (Uuid, i64, Option<DateTime<Utc>>);

fn overview_from_rows(
    items: Vec<OverviewRow>,
    activity: Vec<ActivityRow>,
) -> Vec<EquipmentOverview> {
    let activity: HashMap<Uuid, (i64, Option<DateTime<Utc>>)> = activity
        .into_iter()
        .map(|(id, count, last)| (id, (count, last)))
        .collect();
    items
        .into_iter()
        .map(|(id, name, brand, model, location)| {
            let (count, last) = activity.get(&id).copied().unwrap_or((0, None));
            EquipmentOverview {
                id: EquipmentId::from_uuid(id),
                name,
                brand,
                model,
                location,
                maintenance_count: count_to_u64(count),
                last_performed_on: last,
            }
        })
        .collect()
}

type RecentRow = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    String,
    String,
);

fn recent_from_row(
    (
        record_id,
        equipment_id,
        name,
        model,
        location,
        maintenance_type,
        performed_on,
        observations,
        author_name,
    ): RecentRow,
) -> RecentMaintenance {
    RecentMaintenance {
        record_id: MaintenanceId::from_uuid(record_id),
        equipment: EquipmentSummary {
            id: EquipmentId::from_uuid(equipment_id),
            name,
            model,
        },
        location,
        maintenance_type,
        performed_on,
        observations,
        author_name,
    }
}

#[async_trait]
impl StatsRepository for DieselStatsRepository {
    async fn system_stats(&self, window: StatsWindow) -> Result<SystemStats, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total_equipment: i64 = equipment::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let active_equipment: i64 = equipment::table
            .filter(equipment::status.eq(ACTIVE))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_maintenance: i64 = maintenance_records::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let maintenance_this_month: i64 = maintenance_records::table
            .filter(maintenance_records::performed_on.ge(window.month_start))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_users: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let active_users: i64 = users::table
            .filter(users::status.eq(ACTIVE))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let upcoming = upcoming_count(&mut conn, window)
            .await
            .map_err(map_diesel_error)?;

        Ok(SystemStats {
            total_equipment: count_to_u64(total_equipment),
            active_equipment: count_to_u64(active_equipment),
            total_maintenance: count_to_u64(total_maintenance),
            maintenance_this_month: count_to_u64(maintenance_this_month),
            total_users: count_to_u64(total_users),
            active_users: count_to_u64(active_users),
            upcoming_maintenance: count_to_u64(upcoming),
        })
    }

    async fn upcoming(
        &self,
        window: StatsWindow,
    ) -> Result<Vec<UpcomingMaintenance>, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = maintenance_records::table
            .inner_join(equipment::table)
            .inner_join(users::table)
            .filter(maintenance_records::status.eq(ACTIVE))
            .filter(maintenance_records::next_due.ge(window.now))
            .filter(maintenance_records::next_due.le(window.upcoming_until))
            .order(maintenance_records::next_due.asc())
            .select((
                maintenance_records::id,
                equipment::id,
                equipment::name,
                equipment::model,
                maintenance_records::maintenance_type,
                maintenance_records::next_due,
                users::display_name,
            ))
            .load::<UpcomingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // The filter guarantees `next_due` is set.
        Ok(rows.into_iter().filter_map(upcoming_from_row).collect())
    }

    async fn equipment_overview(
        &self,
        limit: usize,
    ) -> Result<Vec<EquipmentOverview>, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let items = equipment::table
            .filter(equipment::status.eq(ACTIVE))
            .order(equipment::created_at.desc())
            .limit(sql_limit(limit))
            .select((
                equipment::id,
                equipment::name,
                equipment::brand,
                equipment::model,
                equipment::location,
            ))
            .load::<OverviewRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<Uuid> = items.iter().map(|row| row.0).collect();
        let activity = maintenance_records::table
            .filter(maintenance_records::status.eq(ACTIVE))
            .filter(maintenance_records::equipment_id.eq_any(ids))
            .group_by(maintenance_records::equipment_id)
            .select((
                maintenance_records::equipment_id,
                count_star(),
                max(maintenance_records::performed_on),
            ))
            .load::<ActivityRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(overview_from_rows(items, activity))
    }

    async fn recent_maintenance(
        &self,
        equipment_id: Option<EquipmentId>,
        limit: usize,
    ) -> Result<Vec<RecentMaintenance>, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = maintenance_records::table
            .inner_join(equipment::table)
            .inner_join(users::table)
            .select((
                maintenance_records::id,
                equipment::id,
                equipment::name,
                equipment::model,
                equipment::location,
                maintenance_records::maintenance_type,
                maintenance_records::performed_on,
                maintenance_records::observations,
                users::display_name,
            ))
            .filter(maintenance_records::status.eq(ACTIVE))
            .order(maintenance_records::performed_on.desc())
            .into_boxed();
        if let Some(id) = equipment_id {
            query = query.filter(maintenance_records::equipment_id.eq(*id.as_uuid()));
        }
        let rows = query
            .limit(sql_limit(limit))
            .load::<RecentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(recent_from_row).collect())
    }
}
