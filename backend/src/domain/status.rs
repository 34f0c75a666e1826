//! Soft-delete lifecycle status shared by every entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a user, equipment item, or maintenance record.
///
/// Entities start `Activo`. Soft deletion moves them to `Inactivo`; only
/// user accounts have a way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordStatus {
    /// Visible and usable.
    #[default]
    Activo,
    /// Soft-deleted.
    Inactivo,
}

impl RecordStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "ACTIVO",
            Self::Inactivo => "INACTIVO",
        }
    }

    /// Whether the entity is visible to non-administrative reads.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Activo)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RecordStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVO" => Ok(Self::Activo),
            "INACTIVO" => Ok(Self::Inactivo),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}
