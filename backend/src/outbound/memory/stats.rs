//! In-memory [`StatsRepository`].

use async_trait::async_trait;

use crate::domain::ports::{StatsRepository, StatsRepositoryError};
use crate::domain::{
    EquipmentId, EquipmentOverview, MaintenanceRecord, RecentMaintenance, StatsWindow,
    SystemStats, UpcomingMaintenance,
};

use super::SharedTables;
use super::maintenance::join_details;

/// Dashboard counters computed over the shared tables.
#[derive(Clone)]
pub struct InMemoryStatsRepository {
    tables: SharedTables,
}

impl InMemoryStatsRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

fn is_upcoming(record: &MaintenanceRecord, window: &StatsWindow) -> bool {
    record.status.is_active()
        && record
            .next_due
            .is_some_and(|due| due >= window.now && due <= window.upcoming_until)
}

fn count<T>(items: impl Iterator<Item = T>) -> u64 {
    items.count() as u64
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn system_stats(&self, window: StatsWindow) -> Result<SystemStats, StatsRepositoryError> {
        let tables = self.tables.read().await;
        Ok(SystemStats {
            total_equipment: count(tables.equipment.values()),
            active_equipment: count(tables.equipment.values().filter(|e| e.status.is_active())),
            total_maintenance: count(tables.maintenance.values()),
            maintenance_this_month: count(
                tables
                    .maintenance
                    .values()
                    .filter(|m| m.performed_on >= window.month_start),
            ),
            total_users: count(tables.users.values()),
            active_users: count(tables.users.values().filter(|(u, _)| u.is_active())),
            upcoming_maintenance: count(
                tables
                    .maintenance
                    .values()
                    .filter(|m| is_upcoming(m, &window)),
            ),
        })
    }

    async fn upcoming(
        &self,
        window: StatsWindow,
    ) -> Result<Vec<UpcomingMaintenance>, StatsRepositoryError> {
        let tables = self.tables.read().await;
        let mut upcoming: Vec<UpcomingMaintenance> = tables
            .maintenance
            .values()
            .filter(|record| is_upcoming(record, &window))
            .filter_map(|record| {
                let details = join_details(&tables, record)?;
                Some(UpcomingMaintenance {
                    record_id: record.id,
                    equipment: details.equipment,
                    maintenance_type: record.maintenance_type.clone(),
                    next_due: record.next_due?,
                    author_name: details.author_name,
                })
            })
            .collect();
        upcoming.sort_by_key(|entry| entry.next_due);
        Ok(upcoming)
    }

    async fn equipment_overview(
        &self,
        limit: usize,
    ) -> Result<Vec<EquipmentOverview>, StatsRepositoryError> {
        let tables = self.tables.read().await;
        let mut items: Vec<_> = tables
            .equipment
            .values()
            .filter(|item| item.status.is_active())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(items
            .into_iter()
            .take(limit)
            .map(|item| {
                let history = tables
                    .maintenance
                    .values()
                    .filter(|m| m.equipment_id == item.id && m.status.is_active());
                let (maintenance_count, last_performed_on) =
                    history.fold((0_u64, None), |(n, last), m| {
                        (n + 1, last.max(Some(m.performed_on)))
                    });
                EquipmentOverview {
                    id: item.id,
                    name: item.name.clone(),
                    brand: item.brand.clone(),
                    model: item.model.clone(),
                    location: item.location.clone(),
                    maintenance_count,
                    last_performed_on,
                }
            })
            .collect())
    }

    async fn recent_maintenance(
        &self,
        equipment_id: Option<EquipmentId>,
        limit: usize,
    ) -> Result<Vec<RecentMaintenance>, StatsRepositoryError> {
        let tables = self.tables.read().await;
        let mut records: Vec<&MaintenanceRecord> = tables
            .maintenance
            .values()
            .filter(|m| m.status.is_active())
            .filter(|m| equipment_id.is_none_or(|id| m.equipment_id == id))
            .collect();
        records.sort_by(|a, b| b.performed_on.cmp(&a.performed_on));

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let location = tables.equipment.get(&record.equipment_id)?.location.clone();
                let details = join_details(&tables, record)?;
                Some(RecentMaintenance {
                    record_id: record.id,
                    equipment: details.equipment,
                    location,
                    maintenance_type: record.maintenance_type.clone(),
                    performed_on: record.performed_on,
                    observations: record.observations.clone(),
                    author_name: details.author_name,
                })
            })
            .take(limit)
            .collect())
    }
}
