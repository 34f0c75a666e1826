//! Maintenance log entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    EquipmentId, EquipmentSummary, FileKey, MaintenanceId, RecordStatus, RequiredText, SignedUrl,
    UserId,
};

/// Maintenance record row as persisted.
///
/// `equipment_id` and `author_id` are fixed at creation; an administrator
/// editing the record does not become its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    /// Stable identifier.
    pub id: MaintenanceId,
    /// Equipment the work was performed on.
    pub equipment_id: EquipmentId,
    /// Free-text kind of maintenance, e.g. "Preventivo".
    pub maintenance_type: String,
    /// When the work was performed.
    pub performed_on: DateTime<Utc>,
    /// Technician notes.
    pub observations: String,
    /// User who logged the record.
    pub author_id: UserId,
    /// Object key of the attached evidence.
    pub evidence_key: Option<FileKey>,
    /// When the next maintenance is due.
    pub next_due: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields required to log maintenance. The author comes from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceDraft {
    /// Equipment the work was performed on.
    pub equipment_id: EquipmentId,
    /// Kind of maintenance.
    pub maintenance_type: RequiredText,
    /// When the work was performed.
    pub performed_on: DateTime<Utc>,
    /// Technician notes.
    pub observations: RequiredText,
    /// When the next maintenance is due.
    pub next_due: Option<DateTime<Utc>>,
}

/// Partial update for a maintenance record.
///
/// Status, equipment, and author are intentionally absent. `next_due`
/// distinguishes "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceChanges {
    /// Replacement maintenance type.
    pub maintenance_type: Option<RequiredText>,
    /// Replacement performed date.
    pub performed_on: Option<DateTime<Utc>>,
    /// Replacement observations.
    pub observations: Option<RequiredText>,
    /// Replacement or cleared next due date.
    pub next_due: Option<Option<DateTime<Utc>>>,
}

/// Persistence-level patch: field changes plus any new evidence key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenancePatch {
    /// Field changes.
    pub changes: MaintenanceChanges,
    /// Evidence key to store in place of the current one.
    pub evidence_key: Option<FileKey>,
}

/// Record joined with its author's name and parent equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceDetails {
    /// Record row.
    pub record: MaintenanceRecord,
    /// Author display name.
    pub author_name: String,
    /// Parent equipment summary.
    pub equipment: EquipmentSummary,
}

/// Record details enriched with a fresh evidence link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceView {
    /// Joined record.
    pub details: MaintenanceDetails,
    /// Signed link to the evidence; absent when there is none or signing failed.
    pub evidence_url: Option<SignedUrl>,
}
