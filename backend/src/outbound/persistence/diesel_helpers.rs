//! Shared helpers for Diesel repository implementations.
//!
//! Covers conversion between the domain's unsigned page arithmetic and the
//! signed integers PostgreSQL speaks, and decoding of enum columns.

use std::fmt::Display;

use pagination::PageRequest;
use tracing::warn;

/// `LIMIT` for a page request.
pub(super) fn page_limit(page: PageRequest) -> i64 {
    i64::from(page.limit())
}

/// `OFFSET` for a page request, saturating far beyond any real table size.
pub(super) fn page_offset(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}

/// Convert a `COUNT(*)` result, which PostgreSQL never returns negative.
pub(super) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Parse a stored column value, reporting corruption as a message.
pub(super) fn decode_column<T, E, F>(column: &'static str, raw: &str, parse: F) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: Display,
{
    parse(raw).map_err(|error| {
        warn!(column, value = raw, %error, "stored value failed to decode");
        format!("stored {column} is invalid: {error}")
    })
}
