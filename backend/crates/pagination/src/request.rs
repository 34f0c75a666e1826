//! Page request parsing and offset arithmetic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the caller omits one or sends an unusable value.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller omits one or sends an unusable value.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised when a page request is constructed from explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are 1-indexed.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one row.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// Upper bound on the page size.
        max: u32,
    },
}

/// A validated 1-indexed page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request from explicit values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value falls outside the
    /// documented bounds.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing, non-numeric, or zero values fall back to [`DEFAULT_PAGE`] and
    /// [`DEFAULT_LIMIT`]. Oversized limits are capped at [`MAX_LIMIT`].
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::lenient(Some("abc"), Some("500"));
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), 100);
    /// ```
    #[must_use]
    pub fn lenient(raw_page: Option<&str>, raw_limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(raw_page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(raw_limit)
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
        }
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the first row of this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPageRequest {
    page: u32,
    limit: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.page, value.limit)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Request parsing and offset coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 10, 20)]
    #[case(4, 25, 75)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] expected: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::ZeroLimit)]
    #[case(1, 101, PageRequestError::LimitTooLarge { max: MAX_LIMIT })]
    fn new_rejects_out_of_range_values(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some("2"), Some("5"), 2, 5)]
    #[case(Some("0"), Some("0"), 1, 10)]
    #[case(Some("-3"), Some("ten"), 1, 10)]
    #[case(Some(" 4 "), Some("1000"), 4, 100)]
    fn lenient_falls_back_to_defaults(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::lenient(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[test]
    fn deserialising_validates_bounds() {
        let err = serde_json::from_str::<PageRequest>(r#"{"page":0,"limit":10}"#)
            .expect_err("zero page rejected");
        assert!(err.to_string().contains("page must be at least 1"));
    }
}
