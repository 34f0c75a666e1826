//! UUID-backed entity identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct InvalidIdentifier {
    kind: &'static str,
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its hyphenated string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidIdentifier> {
                let raw = raw.as_ref();
                if raw.trim() != raw {
                    return Err(InvalidIdentifier { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| InvalidIdentifier { kind: $kind })
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidIdentifier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

uuid_identifier! {
    /// Stable user identifier.
    UserId => "user id"
}

uuid_identifier! {
    /// Stable equipment identifier.
    EquipmentId => "equipment id"
}

uuid_identifier! {
    /// Stable maintenance record identifier.
    MaintenanceId => "maintenance id"
}
