//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod auth;
pub mod cache_control;
pub mod equipment;
pub mod error;
pub mod files;
pub mod health;
pub mod listing;
pub mod maintenance;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod state;
pub mod stats;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod uploads;
pub mod users;
pub mod validation;

pub use error::ApiResult;
pub use routes::{API_PREFIX, configure_api};
