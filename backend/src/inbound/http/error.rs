//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Internal errors are redacted before they leave the process.

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

/// Status code and optional bearer challenge for each failure category.
const fn mapping(code: ErrorCode) -> (StatusCode, Option<&'static str>) {
    match code {
        ErrorCode::InvalidRequest => (StatusCode::BAD_REQUEST, None),
        ErrorCode::InvalidCredentials => (StatusCode::UNAUTHORIZED, None),
        ErrorCode::Unauthenticated => (StatusCode::UNAUTHORIZED, Some(r#"Bearer realm="bitacora""#)),
        ErrorCode::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            Some(r#"Bearer realm="bitacora", error="invalid_token""#),
        ),
        ErrorCode::AccountDisabled | ErrorCode::Forbidden => (StatusCode::FORBIDDEN, None),
        ErrorCode::NotFound => (StatusCode::NOT_FOUND, None),
        ErrorCode::Conflict => (StatusCode::CONFLICT, None),
        ErrorCode::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, None),
        ErrorCode::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, None),
    }
}

/// Body sent to the client. Internal failures keep only their trace id.
fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        mapping(self.code()).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, challenge) = mapping(self.code());
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if let Some(challenge) = challenge {
            builder.insert_header((WWW_AUTHENTICATE, challenge));
        }
        builder.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in a handler");
        Self::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
