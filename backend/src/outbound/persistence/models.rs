//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Enum columns travel as their upper-case
//! names; conversion back to domain types happens in the repositories.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{equipment, maintenance_records, users};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for updating existing user records.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub email: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub role: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

impl UserUpdate<'_> {
    /// Whether applying the changeset would touch no column.
    pub(crate) fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.display_name.is_none()
            && self.role.is_none()
            && self.password_hash.is_none()
    }
}

// ---------------------------------------------------------------------------
// Equipment models
// ---------------------------------------------------------------------------

/// Row struct for reading from the equipment table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = equipment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EquipmentRow {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub control_id: String,
    pub location: String,
    pub status: String,
    pub manual_key: Option<String>,
    pub manual_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for updating equipment fields.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = equipment)]
pub(crate) struct EquipmentUpdate<'a> {
    pub name: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
    pub serial_number: Option<&'a str>,
    pub control_id: Option<&'a str>,
    pub location: Option<&'a str>,
    pub manual_key: Option<&'a str>,
    pub manual_description: Option<&'a str>,
}

impl EquipmentUpdate<'_> {
    /// Whether applying the changeset would touch no column.
    pub(crate) fn is_empty(&self) -> bool {
        [
            self.name,
            self.brand,
            self.model,
            self.serial_number,
            self.control_id,
            self.location,
            self.manual_key,
            self.manual_description,
        ]
        .iter()
        .all(Option::is_none)
    }
}

// ---------------------------------------------------------------------------
// Maintenance models
// ---------------------------------------------------------------------------

/// Row struct for reading from the maintenance_records table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = maintenance_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MaintenanceRow {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub maintenance_type: String,
    pub performed_on: DateTime<Utc>,
    pub observations: String,
    pub author_id: Uuid,
    pub evidence_key: Option<String>,
    pub next_due: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for updating maintenance fields.
///
/// `next_due: Some(None)` writes `NULL`.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = maintenance_records)]
pub(crate) struct MaintenanceUpdate<'a> {
    pub maintenance_type: Option<&'a str>,
    pub performed_on: Option<DateTime<Utc>>,
    pub observations: Option<&'a str>,
    pub evidence_key: Option<&'a str>,
    pub next_due: Option<Option<DateTime<Utc>>>,
}

impl MaintenanceUpdate<'_> {
    /// Whether applying the changeset would touch no column.
    pub(crate) fn is_empty(&self) -> bool {
        self.maintenance_type.is_none()
            && self.performed_on.is_none()
            && self.observations.is_none()
            && self.evidence_key.is_none()
            && self.next_due.is_none()
    }
}
