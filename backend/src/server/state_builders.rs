//! Builders for HTTP state ports over database or in-memory repositories.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use bitacora::domain::ports::{
    EquipmentRepository, MaintenanceRepository, StatsRepository, UserRepository,
};
use bitacora::domain::{
    BootstrapAdmin, CredentialService, EquipmentService, Error, MaintenanceService,
    SessionService, StatsService, UserAccountService,
};
use bitacora::inbound::http::session::CookiePolicy;
use bitacora::inbound::http::state::{HttpState, HttpStatePorts};
use bitacora::outbound::memory::{
    InMemoryDatabase, InMemoryEquipmentRepository, InMemoryMaintenanceRepository,
    InMemoryStatsRepository, InMemoryUserRepository,
};
use bitacora::outbound::persistence::{
    DbPool, DieselEquipmentRepository, DieselMaintenanceRepository, DieselStatsRepository,
    DieselUserRepository,
};
use bitacora::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use bitacora::outbound::storage::{CapStdObjectStore, UrlSigner};

use super::{ServerConfig, StartupError};

/// One repository per entity, all over the same backing store.
struct Repositories<U, E, M, S> {
    users: Arc<U>,
    equipment: Arc<E>,
    maintenance: Arc<M>,
    stats: Arc<S>,
}

impl
    Repositories<
        DieselUserRepository,
        DieselEquipmentRepository,
        DieselMaintenanceRepository,
        DieselStatsRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            equipment: Arc::new(DieselEquipmentRepository::new(pool.clone())),
            maintenance: Arc::new(DieselMaintenanceRepository::new(pool.clone())),
            stats: Arc::new(DieselStatsRepository::new(pool.clone())),
        }
    }
}

impl
    Repositories<
        InMemoryUserRepository,
        InMemoryEquipmentRepository,
        InMemoryMaintenanceRepository,
        InMemoryStatsRepository,
    >
{
    fn in_memory(database: &InMemoryDatabase) -> Self {
        Self {
            users: Arc::new(database.users()),
            equipment: Arc::new(database.equipment()),
            maintenance: Arc::new(database.maintenance()),
            stats: Arc::new(database.stats()),
        }
    }
}

/// Adapters shared regardless of where records live.
struct SharedAdapters {
    files: Arc<CapStdObjectStore>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<JwtTokenCodec>,
    clock: Arc<dyn Clock>,
}

/// Wire every service over `repos`, seeding the administrator first.
async fn assemble<U, E, M, S>(
    repos: Repositories<U, E, M, S>,
    shared: &SharedAdapters,
    bootstrap: Option<BootstrapAdmin>,
) -> Result<HttpStatePorts, Error>
where
    U: UserRepository + 'static,
    E: EquipmentRepository + 'static,
    M: MaintenanceRepository + 'static,
    S: StatsRepository + 'static,
{
    let Repositories {
        users,
        equipment,
        maintenance,
        stats,
    } = repos;
    let clock = &shared.clock;

    let accounts = UserAccountService::new(
        Arc::clone(&users),
        Arc::clone(&shared.hasher),
        Arc::clone(clock),
    );
    match bootstrap {
        Some(admin) => {
            if accounts.ensure_bootstrap_admin(admin).await?.is_none() {
                info!("active administrator present; bootstrap skipped");
            }
        }
        None => warn!("no bootstrap administrator configured"),
    }

    Ok(HttpStatePorts {
        login: Arc::new(CredentialService::new(
            users,
            Arc::clone(&shared.hasher),
            Arc::clone(&shared.tokens),
            Arc::clone(clock),
        )),
        sessions: Arc::new(SessionService::new(
            Arc::clone(&shared.tokens),
            Arc::clone(clock),
        )),
        users: Arc::new(accounts),
        equipment: Arc::new(EquipmentService::new(
            Arc::clone(&equipment),
            Arc::clone(&shared.files),
            Arc::clone(clock),
        )),
        maintenance: Arc::new(MaintenanceService::new(
            maintenance,
            equipment,
            Arc::clone(&shared.files),
            Arc::clone(clock),
        )),
        stats: Arc::new(StatsService::new(stats, Arc::clone(clock))),
        files: shared.files.clone(),
    })
}

/// Construct HTTP state using database-backed repositories when a pool is
/// configured, otherwise a fresh in-memory database.
pub(super) async fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let signer = UrlSigner::new(config.secrets.signing.as_slice(), &config.public_base_url)?;
    let shared = SharedAdapters {
        files: Arc::new(CapStdObjectStore::open(&config.storage_root, signer)?),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenCodec::new(&config.secrets.token)),
        clock: Arc::clone(&clock),
    };
    let bootstrap = config.bootstrap_admin.clone();

    let ports = match &config.db_pool {
        Some(pool) => assemble(Repositories::diesel(pool), &shared, bootstrap).await?,
        None => {
            warn!("no database configured; records are kept in memory only");
            let database = InMemoryDatabase::new();
            assemble(Repositories::in_memory(&database), &shared, bootstrap).await?
        }
    };

    Ok(web::Data::new(HttpState::new(
        ports,
        clock,
        CookiePolicy {
            secure: config.cookie_secure,
        },
    )))
}
