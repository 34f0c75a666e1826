//! Medical equipment inventory items.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EquipmentId, FileKey, RecordStatus, RequiredText, SignedUrl};

/// Equipment row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Stable identifier.
    pub id: EquipmentId,
    /// Descriptive name, e.g. "Monitor de signos vitales".
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Manufacturer model.
    pub model: String,
    /// Manufacturer serial number; unique across all equipment.
    pub serial_number: String,
    /// Hospital inventory control id.
    pub control_id: String,
    /// Physical location.
    pub location: String,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Object key of the attached manual.
    pub manual_key: Option<FileKey>,
    /// Free-text description of the attached manual.
    pub manual_description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields required to register equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentDraft {
    /// Descriptive name.
    pub name: RequiredText,
    /// Manufacturer.
    pub brand: RequiredText,
    /// Manufacturer model.
    pub model: RequiredText,
    /// Manufacturer serial number.
    pub serial_number: RequiredText,
    /// Hospital inventory control id.
    pub control_id: RequiredText,
    /// Physical location.
    pub location: RequiredText,
    /// Description stored alongside a manual, when one is uploaded.
    pub manual_description: Option<RequiredText>,
}

/// Partial update for equipment. Status is intentionally absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentChanges {
    /// Replacement name.
    pub name: Option<RequiredText>,
    /// Replacement brand.
    pub brand: Option<RequiredText>,
    /// Replacement model.
    pub model: Option<RequiredText>,
    /// Replacement serial number.
    pub serial_number: Option<RequiredText>,
    /// Replacement control id.
    pub control_id: Option<RequiredText>,
    /// Replacement location.
    pub location: Option<RequiredText>,
    /// Replacement manual description.
    pub manual_description: Option<String>,
}

/// Persistence-level patch: field changes plus any new manual key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentPatch {
    /// Field changes.
    pub changes: EquipmentChanges,
    /// Manual key to store in place of the current one.
    pub manual_key: Option<FileKey>,
}

/// Name and model of an equipment item, embedded in maintenance views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    /// Equipment identifier.
    pub id: EquipmentId,
    /// Descriptive name.
    pub name: String,
    /// Manufacturer model.
    pub model: String,
}

impl From<&Equipment> for EquipmentSummary {
    fn from(value: &Equipment) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            model: value.model.clone(),
        }
    }
}

/// Equipment enriched for display with a fresh manual link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentView {
    /// Equipment row.
    pub equipment: Equipment,
    /// Signed link to the manual; absent when there is none or signing failed.
    pub manual_url: Option<SignedUrl>,
}
