//! In-process adapters used when no database is configured and by the
//! integration suites.
//!
//! Every repository handle produced by one [`InMemoryDatabase`] shares the
//! same tables, so joins (maintenance details, stats) see consistent data.
//! Semantics mirror the PostgreSQL adapters: unique serials and emails
//! across all statuses, writes limited to active rows, and foreign keys on
//! maintenance records.

mod equipment;
mod file_store;
mod maintenance;
mod stats;
mod users;

use std::collections::HashMap;
use std::sync::Arc;

use pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::domain::{
    Equipment, EquipmentId, MaintenanceId, MaintenanceRecord, PasswordHash, User, UserId,
};

pub use equipment::InMemoryEquipmentRepository;
pub use file_store::InMemoryFileStore;
pub use maintenance::InMemoryMaintenanceRepository;
pub use stats::InMemoryStatsRepository;
pub use users::InMemoryUserRepository;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, (User, PasswordHash)>,
    equipment: HashMap<EquipmentId, Equipment>,
    maintenance: HashMap<MaintenanceId, MaintenanceRecord>,
}

type SharedTables = Arc<RwLock<Tables>>;

/// Shared in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: SharedTables,
}

impl InMemoryDatabase {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// User repository over these tables.
    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::clone(&self.tables))
    }

    /// Equipment repository over these tables.
    pub fn equipment(&self) -> InMemoryEquipmentRepository {
        InMemoryEquipmentRepository::new(Arc::clone(&self.tables))
    }

    /// Maintenance repository over these tables.
    pub fn maintenance(&self) -> InMemoryMaintenanceRepository {
        InMemoryMaintenanceRepository::new(Arc::clone(&self.tables))
    }

    /// Stats repository over these tables.
    pub fn stats(&self) -> InMemoryStatsRepository {
        InMemoryStatsRepository::new(Arc::clone(&self.tables))
    }
}

/// Slice an already ordered result set into the requested page.
fn paginate<T>(rows: Vec<T>, request: PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let data = rows.into_iter().skip(offset).take(limit).collect();
    Page::new(data, total, request)
}
