//! Server construction and middleware wiring.

mod config;
mod secrets;
mod settings;
mod state_builders;
mod toggles;

pub use config::{Secrets, ServerConfig, bootstrap_admin};
pub use secrets::BuildMode;
pub use settings::AppSettings;
pub use toggles::Toggles;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use bitacora::Trace;
#[cfg(debug_assertions)]
use bitacora::doc::ApiDoc;
use bitacora::domain::Error;
use bitacora::domain::ports::FileStoreError;
use bitacora::inbound::http::health::{HealthState, live, ready};
use bitacora::inbound::http::state::HttpState;
use bitacora::inbound::http::{API_PREFIX, configure_api};
use bitacora::outbound::storage::UrlSignerError;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("attachment store: {0}")]
    Storage(#[from] FileStoreError),
    #[error("download links: {0}")]
    Signer(#[from] UrlSignerError),
    #[error("bootstrap: {0}")]
    Bootstrap(#[from] Error),
    #[error("listener: {0}")]
    Bind(#[from] std::io::Error),
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope(API_PREFIX).configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Wires the adapters, seeds the bootstrap administrator, then binds.
///
/// # Errors
/// Returns [`StartupError`] when an adapter cannot be built, seeding fails,
/// or the socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, StartupError> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config).await?;
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
