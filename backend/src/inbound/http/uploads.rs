//! Attachments embedded in JSON request bodies.
//!
//! Clients send files as `{ "fileName", "contentType", "contentBase64" }`.
//! The decoded bytes are checked against the slot's content-type allow list
//! and [`MAX_UPLOAD_BYTES`] before any handler sees them.

use actix_web::web;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AttachmentKind, AttachmentStatus, CreateOutcome, Error, FileUpload, MAX_UPLOAD_BYTES,
};
use crate::inbound::http::validation::{FieldName, invalid_file_error};

/// JSON body limit large enough for a maximum-size attachment once base64
/// encoded, plus the surrounding fields.
pub const JSON_BODY_LIMIT: usize = MAX_UPLOAD_BYTES / 3 * 4 + 64 * 1024;

/// JSON extractor settings for every route: the attachment-sized limit and
/// malformed bodies reported in the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            Error::invalid_request(format!("invalid JSON body: {err}")).into()
        })
}

/// File attached to a create or update request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadBody {
    /// Client-side file name; sanitised before use in storage keys.
    #[schema(example = "manual-monitor.pdf")]
    pub file_name: String,
    /// MIME type of the content.
    #[schema(example = "application/pdf")]
    pub content_type: String,
    /// Standard base64 encoding of the file.
    pub content_base64: String,
}

impl FileUploadBody {
    /// Decode and validate the attachment for `kind`.
    pub(crate) fn into_upload(
        self,
        kind: AttachmentKind,
        field: FieldName,
    ) -> Result<FileUpload, Error> {
        let bytes = STANDARD
            .decode(self.content_base64.trim())
            .map_err(|err| invalid_file_error(field, format!("content is not base64: {err}")))?;
        FileUpload::new(kind, &self.file_name, &self.content_type, bytes)
            .map_err(|err| invalid_file_error(field, err))
    }
}

/// Decode an optional attachment.
pub(crate) fn optional_upload(
    body: Option<FileUploadBody>,
    kind: AttachmentKind,
    field: FieldName,
) -> Result<Option<FileUpload>, Error> {
    body.map(|body| body.into_upload(kind, field)).transpose()
}

/// Response for create endpoints: the entity plus what happened to its file.
#[derive(Debug, Serialize)]
pub struct CreatedBody<T> {
    #[serde(flatten)]
    pub record: T,
    pub attachment: AttachmentStatus,
}

impl<T> From<CreateOutcome<T>> for CreatedBody<T> {
    fn from(value: CreateOutcome<T>) -> Self {
        Self {
            record: value.record,
            attachment: value.attachment,
        }
    }
}
