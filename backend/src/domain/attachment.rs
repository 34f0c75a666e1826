//! File attachments: validated uploads, object keys, and upload outcomes.
//!
//! Entity rows hold only a [`FileKey`]; bytes live in the file store. Keys
//! are namespaced by the owning entity id and carry a sanitised copy of the
//! client's file name.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{EquipmentId, MaintenanceId};

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Lifetime of a signed download link.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(20 * 60);

const FILE_NAME_MAX: usize = 100;
const PDF: &str = "application/pdf";

/// Which entity slot an upload is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Equipment operating manual.
    Manual,
    /// Maintenance evidence (photo or report).
    Evidence,
}

impl AttachmentKind {
    /// Content types the slot accepts.
    #[must_use]
    pub const fn allowed_content_types(self) -> &'static [&'static str] {
        match self {
            Self::Manual => &[PDF],
            Self::Evidence => &["image/jpeg", "image/png", PDF],
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Manual => "manuales",
            Self::Evidence => "evidencias",
        }
    }
}

/// Validation errors raised when accepting an upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    /// No bytes were supplied.
    #[error("file must not be empty")]
    Empty,
    /// The decoded payload exceeds [`MAX_UPLOAD_BYTES`].
    #[error("file exceeds the {max} byte limit")]
    TooLarge {
        /// Upper bound in bytes.
        max: usize,
    },
    /// The content type is not accepted for this slot.
    #[error("content type {content_type} is not accepted")]
    UnsupportedContentType {
        /// Rejected content type.
        content_type: String,
    },
}

/// Bytes and metadata of a file the caller wants to attach.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// Validate an upload against the slot's size and type rules.
    ///
    /// # Examples
    /// ```
    /// use bitacora::domain::{AttachmentKind, FileUpload};
    ///
    /// let upload = FileUpload::new(
    ///     AttachmentKind::Manual,
    ///     "../Manual de uso.pdf",
    ///     "application/pdf",
    ///     b"%PDF-1.7".to_vec(),
    /// )
    /// .expect("valid upload");
    /// assert_eq!(upload.file_name(), "Manual_de_uso.pdf");
    /// ```
    pub fn new(
        kind: AttachmentKind,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadValidationError> {
        if bytes.is_empty() {
            return Err(UploadValidationError::Empty);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadValidationError::TooLarge {
                max: MAX_UPLOAD_BYTES,
            });
        }
        let content_type = content_type.trim().to_ascii_lowercase();
        if !kind.allowed_content_types().contains(&content_type.as_str()) {
            return Err(UploadValidationError::UnsupportedContentType { content_type });
        }
        Ok(Self {
            file_name: sanitise_file_name(file_name),
            content_type,
            bytes,
        })
    }

    /// Sanitised file name used in the object key.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Normalised content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    /// Raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Keep the last path segment and replace anything outside `[A-Za-z0-9._-]`.
fn sanitise_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(FILE_NAME_MAX)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "archivo".to_owned()
    } else {
        cleaned.to_owned()
    }
}

/// Errors raised when a string is not a usable object key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid file key: {key}")]
pub struct InvalidFileKey {
    key: String,
}

/// Object-store key of an attached file.
///
/// ## Invariants
/// - Non-empty relative path of `/`-separated segments.
/// - No segment is empty, `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileKey(String);

impl FileKey {
    /// Validate a stored or requested key.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidFileKey> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
            && !raw.contains('\\');
        if valid {
            Ok(Self(raw))
        } else {
            Err(InvalidFileKey { key: raw })
        }
    }

    /// Key for the manual uploaded together with new equipment.
    #[must_use]
    pub fn for_new_manual(equipment: &EquipmentId, upload: &FileUpload) -> Self {
        Self(format!(
            "{}/{equipment}-{}",
            AttachmentKind::Manual.prefix(),
            upload.file_name()
        ))
    }

    /// Timestamped key for a manual replacing an existing one.
    #[must_use]
    pub fn for_replacement_manual(
        equipment: &EquipmentId,
        millis: i64,
        upload: &FileUpload,
    ) -> Self {
        Self(format!(
            "{}/{equipment}-{millis}-{}",
            AttachmentKind::Manual.prefix(),
            upload.file_name()
        ))
    }

    /// Timestamped key for maintenance evidence.
    #[must_use]
    pub fn for_evidence(record: &MaintenanceId, millis: i64, upload: &FileUpload) -> Self {
        Self(format!(
            "{}/{record}-{millis}-{}",
            AttachmentKind::Evidence.prefix(),
            upload.file_name()
        ))
    }

    /// Key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FileKey> for String {
    fn from(value: FileKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for FileKey {
    type Error = InvalidFileKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Time-limited download link for an attachment. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignedUrl(String);

impl SignedUrl {
    /// Wrap a link produced by a file store.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Link text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// What happened to the optional file of a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentStatus {
    /// The request carried no file.
    NotProvided,
    /// The file was stored and referenced by the new row.
    Stored,
    /// The row was created but the file is not attached to it.
    UploadFailed,
}

/// Entity created together with an optional attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOutcome<T> {
    /// The created entity as persisted.
    pub record: T,
    /// Attachment result; the entity exists regardless.
    pub attachment: AttachmentStatus,
}

#[cfg(test)]
mod tests {
    //! Upload validation and key construction coverage.
    use super::*;
    use rstest::rstest;

    fn pdf(name: &str) -> FileUpload {
        FileUpload::new(
            AttachmentKind::Manual,
            name,
            "application/pdf",
            b"%PDF".to_vec(),
        )
        .expect("valid upload")
    }

    #[rstest]
    #[case("manual.pdf", "manual.pdf")]
    #[case("C:\\docs\\Monitor Philips.pdf", "Monitor_Philips.pdf")]
    #[case("../../etc/passwd", "passwd")]
    #[case("...", "archivo")]
    #[case("ñandú.pdf", "_and_.pdf")]
    fn file_names_are_sanitised(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(pdf(raw).file_name(), expected);
    }

    #[rstest]
    #[case(AttachmentKind::Manual, "image/png", false)]
    #[case(AttachmentKind::Manual, "APPLICATION/PDF", true)]
    #[case(AttachmentKind::Evidence, "image/jpeg", true)]
    #[case(AttachmentKind::Evidence, "image/png", true)]
    #[case(AttachmentKind::Evidence, "application/pdf", true)]
    #[case(AttachmentKind::Evidence, "text/plain", false)]
    fn content_types_follow_slot_rules(
        #[case] kind: AttachmentKind,
        #[case] content_type: &str,
        #[case] accepted: bool,
    ) {
        let result = FileUpload::new(kind, "file", content_type, vec![1]);
        assert_eq!(result.is_ok(), accepted);
    }

    #[test]
    fn rejects_oversized_uploads() {
        let result = FileUpload::new(
            AttachmentKind::Evidence,
            "photo.png",
            "image/png",
            vec![0; MAX_UPLOAD_BYTES + 1],
        );
        assert_eq!(
            result,
            Err(UploadValidationError::TooLarge {
                max: MAX_UPLOAD_BYTES
            })
        );
    }

    #[test]
    fn rejects_empty_uploads() {
        let result = FileUpload::new(AttachmentKind::Evidence, "photo.png", "image/png", vec![]);
        assert_eq!(result, Err(UploadValidationError::Empty));
    }

    #[test]
    fn keys_are_namespaced_by_entity() {
        let equipment = EquipmentId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id");
        let record = MaintenanceId::new("6c1f2a4e-8d3b-4f5a-9e7c-1b2d3e4f5a6b").expect("id");
        let upload = pdf("guia.pdf");

        assert_eq!(
            FileKey::for_new_manual(&equipment, &upload).as_str(),
            "manuales/3fa85f64-5717-4562-b3fc-2c963f66afa6-guia.pdf"
        );
        assert_eq!(
            FileKey::for_replacement_manual(&equipment, 1_700_000_000_000, &upload).as_str(),
            "manuales/3fa85f64-5717-4562-b3fc-2c963f66afa6-1700000000000-guia.pdf"
        );
        assert_eq!(
            FileKey::for_evidence(&record, 42, &upload).as_str(),
            "evidencias/6c1f2a4e-8d3b-4f5a-9e7c-1b2d3e4f5a6b-42-guia.pdf"
        );
    }

    #[rstest]
    #[case("")]
    #[case("/absolute")]
    #[case("manuales/../secret")]
    #[case("manuales//double")]
    #[case("manuales\\win")]
    fn rejects_unsafe_keys(#[case] raw: &str) {
        assert!(FileKey::new(raw).is_err());
    }
}
