//! Helpers shared by the domain services.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{FileStore, FileStoreError, UserPersistenceError};
use crate::domain::{Error, FileKey, SIGNED_URL_TTL, SignedUrl};

/// Details code attached to `not_found` when a file removal finds nothing.
pub(crate) const NO_FILE_ATTACHED: &str = "no_file_attached";

/// `service_unavailable` when the backend is unreachable, `internal`
/// otherwise.
pub(crate) fn outage_or_internal(error: &impl fmt::Display, unavailable: bool) -> Error {
    if unavailable {
        Error::service_unavailable(error.to_string())
    } else {
        Error::internal(error.to_string())
    }
}

pub(crate) fn map_file_store_error(error: FileStoreError) -> Error {
    outage_or_internal(&error, error.is_unavailable())
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Conflict { field } => conflict_on(&field),
        other => outage_or_internal(&other, other.is_unavailable()),
    }
}

pub(crate) fn conflict_on(field: &str) -> Error {
    Error::conflict(format!("{field} is already in use")).with_details(json!({ "field": field }))
}

pub(crate) fn no_file_attached(message: &str) -> Error {
    Error::not_found(message).with_details(json!({ "code": NO_FILE_ATTACHED }))
}

/// Add a fixed duration to an instant, surfacing overflow as an internal error.
pub(crate) fn add_duration(at: DateTime<Utc>, span: Duration) -> Result<DateTime<Utc>, Error> {
    TimeDelta::from_std(span)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| Error::internal(format!("duration {span:?} overflows from {at}")))
}

/// Delete an object without letting a failure reach the caller.
pub(crate) async fn discard_file<F>(store: &F, key: &FileKey, reason: &'static str)
where
    F: FileStore + ?Sized,
{
    if let Err(error) = store.delete(key).await {
        warn!(key = %key, reason, %error, "failed to delete stored file");
    }
}

/// Fresh download link for an attachment, or `None` when there is none or
/// signing fails.
pub(crate) async fn signed_link<F>(
    store: &F,
    key: Option<&FileKey>,
    now: DateTime<Utc>,
) -> Option<SignedUrl>
where
    F: FileStore + ?Sized,
{
    let key = key?;
    let expires_at = match add_duration(now, SIGNED_URL_TTL) {
        Ok(at) => at,
        Err(error) => {
            warn!(key = %key, %error, "cannot compute signed link expiry");
            return None;
        }
    };
    match store.signed_url(key, expires_at).await {
        Ok(url) => Some(url),
        Err(error) => {
            warn!(key = %key, %error, "failed to sign download link");
            None
        }
    }
}
