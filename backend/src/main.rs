//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bitacora::inbound::http::health::HealthState;
use bitacora::outbound::persistence::{DbPool, run_migrations};
use server::{
    AppSettings, BuildMode, Secrets, ServerConfig, Toggles, bootstrap_admin, create_server,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let toggles = Toggles::from_env(&DefaultEnv::new())?;
    let secrets = Secrets::load(&settings, &toggles, BuildMode::from_debug_assertions())?;

    let mut config = ServerConfig::new(
        settings.bind_addr()?,
        secrets,
        settings.storage_root(),
        settings.public_base_url(),
    )
    .with_cookie_secure(toggles.cookie_secure)
    .with_bootstrap_admin(bootstrap_admin(&settings)?);

    if let Some(pool_config) = settings.pool_config() {
        run_migrations(pool_config.database_url()).await?;
        let pool = DbPool::new(pool_config).await?;
        config = config.with_db_pool(pool);
    }

    info!(bind_addr = %config.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await?;
    Ok(())
}
