//! Bitácora CMA backend: inventory and maintenance log for hospital medical
//! equipment.
//!
//! The crate is laid out hexagonally. [`domain`] holds entities, ports, and
//! the use-case services; [`inbound::http`] exposes them over actix-web;
//! [`outbound`] implements the driven ports (PostgreSQL, in-memory, the
//! filesystem object store, JWT and Argon2).

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
