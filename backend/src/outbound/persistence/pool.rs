//! `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! Checkout waits at most [`PoolConfig::checkout_timeout`]. Every failure
//! is reported as a [`PoolError`] and reaches the domain as a connection
//! error.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Connection-level failures raised before any query runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection freed up before the checkout timeout.
    #[error("failed to get connection from pool: {0}")]
    Checkout(String),
    /// The pool could not open its connections.
    #[error("failed to build connection pool: {0}")]
    Build(String),
    /// A schema migration could not be applied.
    #[error("failed to migrate database: {0}")]
    Migration(String),
}

impl PoolError {
    /// Cause reported by the driver or the pool.
    pub fn message(&self) -> &str {
        match self {
            Self::Checkout(message) | Self::Build(message) | Self::Migration(message) => message,
        }
    }
}

/// Pool sizing for one database URL.
///
/// ```
/// use std::time::Duration;
/// use bitacora::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://bitacora@localhost/bitacora")
///     .with_max_size(16)
///     .with_checkout_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Default number of pooled connections.
    pub const DEFAULT_MAX_SIZE: u32 = 10;
    /// Default wait for a free connection.
    pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            checkout_timeout: Self::DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the pool at `max_size` connections. Zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }
}

/// Shared handle to the connection pool; clones share the same connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections open lazily on first checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool rejects the configuration.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(None)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none frees up before the timeout
    /// or the database refuses a new connection.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::Checkout(err.to_string()))
    }
}
