//! Signed attachment downloads.
//!
//! ```text
//! GET /api/v1/files/manuals/{equipment}/{name}?expires=1772443200&signature=9f2c...
//! ```
//!
//! The link itself is the credential, so no session is required.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::domain::ports::FileStoreError;
use crate::domain::{Error, FileKey};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};

/// Query parameters of a signed link.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SignedLinkQuery {
    /// Expiry as Unix seconds.
    pub expires: i64,
    /// Hex HMAC over key and expiry.
    pub signature: String,
}

fn map_download_error(error: FileStoreError) -> Error {
    match error {
        FileStoreError::Rejected { message } => {
            debug!(%message, "signed link refused");
            Error::forbidden("download link is invalid or expired")
        }
        FileStoreError::NotFound { .. } => Error::not_found("file not found"),
        FileStoreError::Unavailable { message } => Error::service_unavailable(message),
        other => Error::internal(other.to_string()),
    }
}

/// Stream an attachment named by a signed link.
#[utoipa::path(
    get,
    path = "/api/v1/files/{key}",
    params(("key" = String, Path, description = "Object key"), SignedLinkQuery),
    responses(
        (status = 200, description = "Attachment bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed key", body = ErrorSchema),
        (status = 403, description = "Forged, altered, or expired link", body = ErrorSchema),
        (status = 404, description = "No such object", body = ErrorSchema)
    ),
    tags = ["files"],
    operation_id = "downloadFile",
    security([])
)]
#[get("/files/{key:.*}")]
pub async fn download_file(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<SignedLinkQuery>,
) -> ApiResult<HttpResponse> {
    let key = FileKey::new(path.into_inner())
        .map_err(|err| invalid_field_error(FieldName::new("key"), err))?;
    let stored = state
        .files
        .open_signed(&key, query.expires, &query.signature, state.clock.utc())
        .await
        .map_err(map_download_error)?;

    Ok(HttpResponse::Ok()
        .content_type(stored.content_type)
        .insert_header(private_no_store_header())
        .body(stored.bytes))
}
