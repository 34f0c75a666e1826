//! Driving port for dashboard statistics.
use async_trait::async_trait;

use crate::domain::{
    EquipmentId, EquipmentOverview, Error, RecentMaintenance, SystemStats, UpcomingMaintenance,
};

/// Dashboard queries, evaluated against the current instant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// System-wide counters.
    async fn system_stats(&self) -> Result<SystemStats, Error>;

    /// Records due within the upcoming window, soonest first.
    async fn upcoming_maintenance(&self) -> Result<Vec<UpcomingMaintenance>, Error>;

    /// Active equipment with maintenance activity, newest first.
    async fn equipment_overview(&self) -> Result<Vec<EquipmentOverview>, Error>;

    /// Latest active records, for one equipment item or across all.
    async fn recent_maintenance(
        &self,
        equipment_id: Option<EquipmentId>,
    ) -> Result<Vec<RecentMaintenance>, Error>;
}
