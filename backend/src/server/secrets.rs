//! Signing secrets read from files at startup.

use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

/// Secrets shorter than this are refused in release builds.
pub const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_LEN: usize = 64;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to throwaway secrets.
    Debug,
    /// Release builds require real secrets of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while loading a secret.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Reading the secret file failed.
    #[error("failed to read {label} at {path}: {source}")]
    Read {
        label: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("{label} at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        label: &'static str,
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The file exists but is empty.
    #[error("{label} at {path} is empty")]
    Empty { label: &'static str, path: PathBuf },
}

/// Read the secret at `path`.
///
/// When the file is unreadable and the mode is [`BuildMode::Debug`] or
/// `allow_ephemeral` is set, a random secret is generated instead; sessions
/// and links then stop validating after a restart.
pub fn load_secret(
    label: &'static str,
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, SecretError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length == 0 {
                return Err(SecretError::Empty {
                    label,
                    path: path.to_path_buf(),
                });
            }
            if mode == BuildMode::Release && length < SECRET_MIN_LEN {
                bytes.zeroize();
                return Err(SecretError::TooShort {
                    label,
                    path: path.to_path_buf(),
                    length,
                    min_len: SECRET_MIN_LEN,
                });
            }
            Ok(Zeroizing::new(bytes))
        }
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                %label,
                path = %path.display(),
                error = %source,
                "using temporary secret (dev only)"
            );
            let mut bytes = vec![0_u8; EPHEMERAL_LEN];
            rand::thread_rng().fill_bytes(&mut bytes);
            Ok(Zeroizing::new(bytes))
        }
        Err(source) => Err(SecretError::Read {
            label,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write_secret(dir: &TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("secret");
        std::fs::write(&path, bytes).expect("write secret");
        path
    }

    #[rstest]
    #[case(BuildMode::Debug)]
    #[case(BuildMode::Release)]
    fn file_contents_are_used(#[case] mode: BuildMode) {
        let dir = TempDir::new().expect("tempdir");
        let path = write_secret(&dir, &[7_u8; SECRET_MIN_LEN]);

        let secret = load_secret("token secret", &path, mode, false).expect("secret loads");
        assert_eq!(secret.as_slice(), &[7_u8; SECRET_MIN_LEN]);
    }

    #[rstest]
    fn short_secret_is_refused_in_release() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_secret(&dir, b"short");

        let err = load_secret("token secret", &path, BuildMode::Release, false)
            .expect_err("too short");
        assert!(matches!(err, SecretError::TooShort { length: 5, .. }));
    }

    #[rstest]
    fn short_secret_is_tolerated_in_debug() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_secret(&dir, b"short");

        let secret =
            load_secret("token secret", &path, BuildMode::Debug, false).expect("debug accepts");
        assert_eq!(secret.as_slice(), b"short");
    }

    #[rstest]
    fn empty_secret_is_refused() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_secret(&dir, b"");

        let err = load_secret("signing secret", &path, BuildMode::Debug, true)
            .expect_err("empty file");
        assert!(matches!(err, SecretError::Empty { .. }));
    }

    #[rstest]
    #[case(BuildMode::Debug, false)]
    #[case(BuildMode::Release, true)]
    fn missing_file_falls_back_when_allowed(#[case] mode: BuildMode, #[case] allow: bool) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent");

        let first = load_secret("signing secret", &path, mode, allow).expect("ephemeral");
        let second = load_secret("signing secret", &path, mode, allow).expect("ephemeral");
        assert_eq!(first.len(), EPHEMERAL_LEN);
        assert_ne!(first.as_slice(), second.as_slice());
    }

    #[rstest]
    fn missing_file_is_fatal_in_release() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent");

        let err = load_secret("token secret", &path, BuildMode::Release, false)
            .expect_err("release requires the file");
        assert!(matches!(err, SecretError::Read { .. }));
    }
}
