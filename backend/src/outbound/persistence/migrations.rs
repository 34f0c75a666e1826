//! Embedded schema migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration over a dedicated synchronous connection.
///
/// Runs on the blocking thread pool so the async runtime keeps serving.
///
/// # Errors
///
/// Returns [`PoolError::Migration`] when the database is unreachable or a
/// migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| PoolError::Migration(format!("connection: {err}")))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::Migration(err.to_string()))?;
        info!(applied = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|err| PoolError::Migration(format!("task: {err}")))?
}
