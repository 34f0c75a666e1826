//! Dashboard statistics.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EquipmentId, EquipmentSummary, MaintenanceId};

/// Window ahead of "now" in which a next-due date counts as upcoming.
pub const UPCOMING_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Rows in the equipment overview.
pub const EQUIPMENT_OVERVIEW_LIMIT: usize = 10;

/// Rows in the recent maintenance feed.
pub const RECENT_MAINTENANCE_LIMIT: usize = 20;

/// System-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// Equipment rows in any status.
    pub total_equipment: u64,
    /// Active equipment rows.
    pub active_equipment: u64,
    /// Maintenance rows in any status.
    pub total_maintenance: u64,
    /// Maintenance performed since the start of the current calendar month.
    pub maintenance_this_month: u64,
    /// User accounts in any status.
    pub total_users: u64,
    /// Active user accounts.
    pub active_users: u64,
    /// Active records whose next due date falls inside [`UPCOMING_WINDOW`].
    pub upcoming_maintenance: u64,
}

/// Active record whose next maintenance is due soon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMaintenance {
    /// Record identifier.
    pub record_id: MaintenanceId,
    /// Equipment the record belongs to.
    pub equipment: EquipmentSummary,
    /// Type of the last maintenance.
    pub maintenance_type: String,
    /// Next due date.
    pub next_due: DateTime<Utc>,
    /// Author display name.
    pub author_name: String,
}

/// Active equipment with a digest of its active maintenance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentOverview {
    pub id: EquipmentId,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub location: String,
    /// Active maintenance records logged against the equipment.
    pub maintenance_count: u64,
    /// Most recent `performed_on` among those records.
    pub last_performed_on: Option<DateTime<Utc>>,
}

/// Active record in the recent maintenance feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMaintenance {
    pub record_id: MaintenanceId,
    pub equipment: EquipmentSummary,
    /// Where the equipment is installed.
    pub location: String,
    pub maintenance_type: String,
    pub performed_on: DateTime<Utc>,
    pub observations: String,
    pub author_name: String,
}

/// Instants bounding the stats queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    /// First instant of the current calendar month (UTC).
    pub month_start: DateTime<Utc>,
    /// Current instant.
    pub now: DateTime<Utc>,
    /// `now` plus [`UPCOMING_WINDOW`].
    pub upcoming_until: DateTime<Utc>,
}
