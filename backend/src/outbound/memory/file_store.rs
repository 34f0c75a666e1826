//! In-memory [`FileStore`] with a switch for simulating an outage.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{FileStore, FileStoreError};
use crate::domain::{FileKey, SignedUrl};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Object map keyed by [`FileKey`].
///
/// Links are `memory://` URLs; they carry the expiry but are not verifiable.
#[derive(Clone, Default)]
pub struct InMemoryFileStore {
    objects: Arc<RwLock<HashMap<FileKey, StoredObject>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `Unavailable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Whether an object is stored under `key`.
    pub async fn contains(&self, key: &FileKey) -> bool {
        self.objects.read().await.contains_key(key)
    }

    /// Bytes and content type stored under `key`.
    pub async fn object(&self, key: &FileKey) -> Option<(Vec<u8>, String)> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|object| (object.bytes.clone(), object.content_type.clone()))
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_online(&self) -> Result<(), FileStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(FileStoreError::unavailable("in-memory store switched offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn put(
        &self,
        key: &FileKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), FileStoreError> {
        self.ensure_online()?;
        self.objects.write().await.insert(
            key.clone(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_owned(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &FileKey) -> Result<(), FileStoreError> {
        self.ensure_online()?;
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| FileStoreError::not_found(key.as_str()))
    }

    async fn signed_url(
        &self,
        key: &FileKey,
        expires_at: DateTime<Utc>,
    ) -> Result<SignedUrl, FileStoreError> {
        self.ensure_online()?;
        if !self.contains(key).await {
            return Err(FileStoreError::not_found(key.as_str()));
        }
        Ok(SignedUrl::new(format!(
            "memory://{key}?expires={}",
            expires_at.timestamp()
        )))
    }
}
