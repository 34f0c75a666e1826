//! Port for the object store holding manuals and evidence.
//!
//! The store is independent of the entity rows: nothing ties an object's
//! lifetime to the row that references it, so services order their calls to
//! keep the two consistent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FileKey, SignedUrl};

use super::define_port_error;

define_port_error! {
    /// Errors raised by file store adapters.
    pub enum FileStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } =>
            "file store unavailable: {message}"; unavailable,
        /// No object exists under the key.
        NotFound { key: String } => "no stored object under {key}",
        /// Reading or writing the object failed.
        Io { message: String } => "file store i/o failed: {message}",
        /// A download link could not be produced.
        Signing { message: String } => "file store could not sign a link: {message}",
        /// A presented link is forged, altered, or past its expiry.
        Rejected { message: String } => "file store rejected the link: {message}",
    }
}

/// Object storage for attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &FileKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), FileStoreError>;

    /// Delete the object under `key`.
    async fn delete(&self, key: &FileKey) -> Result<(), FileStoreError>;

    /// Produce a time-limited read link valid until `expires_at`.
    async fn signed_url(
        &self,
        key: &FileKey,
        expires_at: DateTime<Utc>,
    ) -> Result<SignedUrl, FileStoreError>;
}

/// Object bytes with the content type they are served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Object contents.
    pub bytes: Vec<u8>,
    /// MIME type for the response.
    pub content_type: String,
}

/// Read side of signed links: resolves a link back to the object it names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignedFileReader: Send + Sync {
    /// Verify `signature` over `key` and `expires` (Unix seconds), then read
    /// the object.
    ///
    /// Links whose expiry is before `now` are rejected even when the
    /// signature is valid.
    async fn open_signed(
        &self,
        key: &FileKey,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<StoredFile, FileStoreError>;
}
