//! Port for the aggregate counters shown on the dashboard.
use async_trait::async_trait;

use crate::domain::{
    EquipmentId, EquipmentOverview, RecentMaintenance, StatsWindow, SystemStats,
    UpcomingMaintenance,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by stats adapters.
    pub enum StatsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "stats repository connection failed: {message}"; unavailable,
        /// Query failed during execution.
        Query { message: String } => "stats repository query failed: {message}",
    }
}

/// Read-only aggregate queries across all entities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Count rows for the dashboard counters.
    async fn system_stats(&self, window: StatsWindow) -> Result<SystemStats, StatsRepositoryError>;

    /// Active records whose next due date lies in `[now, upcoming_until]`,
    /// soonest first.
    async fn upcoming(
        &self,
        window: StatsWindow,
    ) -> Result<Vec<UpcomingMaintenance>, StatsRepositoryError>;

    /// Up to `limit` active equipment items, newest first, each with its
    /// active record count and latest `performed_on`.
    async fn equipment_overview(
        &self,
        limit: usize,
    ) -> Result<Vec<EquipmentOverview>, StatsRepositoryError>;

    /// Up to `limit` active records, latest `performed_on` first, optionally
    /// restricted to one equipment item.
    async fn recent_maintenance(
        &self,
        equipment_id: Option<EquipmentId>,
        limit: usize,
    ) -> Result<Vec<RecentMaintenance>, StatsRepositoryError>;
}
