//! Classify Diesel and pool failures before repositories translate them.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// What went wrong, reduced to the cases repositories care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DbFailure {
    Unique(String),
    ForeignKey(String),
    Connection(&'static str),
    Query(&'static str),
}

impl DbFailure {
    /// Resolve the failure with the repository's own constructors. Integrity
    /// violations not matched beforehand are reported as query errors.
    pub(super) fn resolve<E>(
        self,
        query: impl FnOnce(&'static str) -> E,
        connection: impl FnOnce(&'static str) -> E,
    ) -> E {
        match self {
            Self::Connection(message) => connection(message),
            Self::Query(message) => query(message),
            Self::Unique(_) | Self::ForeignKey(_) => query("constraint violated"),
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(kind, info) => {
                let constraint = info.constraint_name().unwrap_or_default().to_owned();
                debug!(?kind, message = info.message(), %constraint, "database rejected statement");
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::Unique(constraint),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKey(constraint),
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection error")
                    }
                    _ => Self::Query("database error"),
                }
            }
            DieselError::NotFound => Self::Query("record not found"),
            DieselError::QueryBuilderError(source) => {
                debug!(error = %source, "diesel query could not be built");
                Self::Query("database query error")
            }
            other => {
                debug!(error = %other, "diesel operation failed");
                Self::Query("database error")
            }
        }
    }
}

/// Pool failures always mean the database is unreachable.
pub(super) fn map_basic_pool_error<E>(error: &PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.message().to_owned())
}
