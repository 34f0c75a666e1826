//! Shared cache-control policies for HTTP handlers.

/// Responses carrying credentials or attachment bytes must not be stored.
pub const PRIVATE_NO_STORE: &str = "private, no-store";

/// Build the cache-control header tuple for credential and download
/// responses.
pub const fn private_no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_STORE)
}
