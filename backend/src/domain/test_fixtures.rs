//! Shared builders for service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AttachmentKind, DisplayName, Email, Equipment, EquipmentId, EquipmentSummary, FileKey,
    FileUpload, Identity, MaintenanceDetails, MaintenanceId, MaintenanceRecord, RecordStatus,
    Role, User, UserId,
};

pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub(crate) fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(fixture_now()))
}

pub(crate) fn identity(role: Role) -> Identity {
    Identity {
        user_id: UserId::random(),
        display_name: DisplayName::new("Ana Torres").expect("name"),
        role,
    }
}

pub(crate) fn user(email: &str, role: Role, status: RecordStatus) -> User {
    User {
        id: UserId::random(),
        email: Email::new(email).expect("email"),
        display_name: DisplayName::new("Ana Torres").expect("name"),
        role,
        status,
        created_at: fixture_now(),
    }
}

pub(crate) fn equipment(manual: Option<&str>) -> Equipment {
    Equipment {
        id: EquipmentId::random(),
        name: "Monitor de signos vitales".to_owned(),
        brand: "Philips".to_owned(),
        model: "IntelliVue MX450".to_owned(),
        serial_number: "SN-0001".to_owned(),
        control_id: "CMA-001".to_owned(),
        location: "UCI".to_owned(),
        status: RecordStatus::Activo,
        manual_key: manual.map(|key| FileKey::new(key).expect("key")),
        manual_description: manual.map(|_| "Manual de usuario".to_owned()),
        created_at: fixture_now(),
    }
}

pub(crate) fn record(author: &UserId, evidence: Option<&str>) -> MaintenanceRecord {
    MaintenanceRecord {
        id: MaintenanceId::random(),
        equipment_id: EquipmentId::random(),
        maintenance_type: "Preventivo".to_owned(),
        performed_on: fixture_now(),
        observations: "Calibración completa".to_owned(),
        author_id: *author,
        evidence_key: evidence.map(|key| FileKey::new(key).expect("key")),
        next_due: None,
        status: RecordStatus::Activo,
        created_at: fixture_now(),
    }
}

pub(crate) fn details(record: MaintenanceRecord) -> MaintenanceDetails {
    MaintenanceDetails {
        equipment: EquipmentSummary {
            id: record.equipment_id,
            name: "Monitor de signos vitales".to_owned(),
            model: "IntelliVue MX450".to_owned(),
        },
        author_name: "Ana Torres".to_owned(),
        record,
    }
}

pub(crate) fn pdf_upload(kind: AttachmentKind) -> FileUpload {
    FileUpload::new(kind, "manual.pdf", "application/pdf", b"%PDF-1.7".to_vec())
        .expect("valid upload")
}
