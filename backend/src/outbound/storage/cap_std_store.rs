//! Local-disk object store confined to one root directory via `cap-std`.
//!
//! Objects live under `objects/{key}`; the content type they were uploaded
//! with is kept beside them under `content-types/{key}`. All filesystem work
//! runs on the blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{FileStore, FileStoreError, SignedFileReader, StoredFile};
use crate::domain::{FileKey, SignedUrl};

use super::url_signer::{UrlSigner, UrlSignerError};

const OBJECTS: &str = "objects";
const CONTENT_TYPES: &str = "content-types";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Filesystem-backed [`FileStore`] serving its own signed links.
#[derive(Clone)]
pub struct CapStdObjectStore {
    root: Arc<Dir>,
    signer: UrlSigner,
}

impl CapStdObjectStore {
    /// Open (creating if needed) the store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Unavailable`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Path, signer: UrlSigner) -> Result<Self, FileStoreError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|err| unavailable(root, &err))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| unavailable(root, &err))?;
        for area in [OBJECTS, CONTENT_TYPES] {
            dir.create_dir_all(area).map_err(|err| unavailable(root, &err))?;
        }
        Ok(Self {
            root: Arc::new(dir),
            signer,
        })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, FileStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, FileStoreError> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || op(&root))
            .await
            .map_err(|err| FileStoreError::io(format!("storage task failed: {err}")))?
    }
}

fn unavailable(root: &Path, error: &io::Error) -> FileStoreError {
    FileStoreError::unavailable(format!("{}: {error}", root.display()))
}

fn object_path(key: &FileKey) -> PathBuf {
    Path::new(OBJECTS).join(key.as_str())
}

fn content_type_path(key: &FileKey) -> PathBuf {
    Path::new(CONTENT_TYPES).join(key.as_str())
}

fn map_io_error(key: &FileKey, error: io::Error) -> FileStoreError {
    if error.kind() == io::ErrorKind::NotFound {
        FileStoreError::not_found(key.as_str())
    } else {
        debug!(key = %key, %error, "object store i/o failed");
        FileStoreError::io(format!("{key}: {error}"))
    }
}

/// Write through a uniquely named sibling so readers never see a torn file.
fn write_replacing(dir: &Dir, path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        dir.create_dir_all(parent)?;
    }
    let staging = path.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
    dir.write(&staging, bytes)?;
    dir.rename(&staging, dir, path).inspect_err(|_| {
        let _ = dir.remove_file(&staging);
    })
}

fn map_signer_error(error: UrlSignerError) -> FileStoreError {
    FileStoreError::rejected(error.to_string())
}

#[async_trait]
impl FileStore for CapStdObjectStore {
    async fn put(
        &self,
        key: &FileKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), FileStoreError> {
        let key = key.clone();
        let bytes = bytes.to_vec();
        let content_type = content_type.to_owned();
        self.blocking(move |dir| {
            write_replacing(dir, &object_path(&key), &bytes)
                .and_then(|()| {
                    write_replacing(dir, &content_type_path(&key), content_type.as_bytes())
                })
                .map_err(|err| map_io_error(&key, err))
        })
        .await
    }

    async fn delete(&self, key: &FileKey) -> Result<(), FileStoreError> {
        let key = key.clone();
        self.blocking(move |dir| {
            dir.remove_file(object_path(&key))
                .map_err(|err| map_io_error(&key, err))?;
            if let Err(error) = dir.remove_file(content_type_path(&key)) {
                debug!(key = %key, %error, "content type sidecar already gone");
            }
            Ok(())
        })
        .await
    }

    async fn signed_url(
        &self,
        key: &FileKey,
        expires_at: DateTime<Utc>,
    ) -> Result<SignedUrl, FileStoreError> {
        Ok(self.signer.sign(key, expires_at))
    }
}

#[async_trait]
impl SignedFileReader for CapStdObjectStore {
    async fn open_signed(
        &self,
        key: &FileKey,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<StoredFile, FileStoreError> {
        self.signer
            .verify(key, expires, signature, now)
            .map_err(map_signer_error)?;

        let key = key.clone();
        self.blocking(move |dir| {
            let bytes = dir
                .read(object_path(&key))
                .map_err(|err| map_io_error(&key, err))?;
            let content_type = dir
                .read_to_string(content_type_path(&key))
                .unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_owned());
            Ok(StoredFile {
                bytes,
                content_type,
            })
        })
        .await
    }
}
