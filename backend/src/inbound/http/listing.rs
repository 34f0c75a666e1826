//! Query string shared by list endpoints.

use pagination::PageRequest;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::SearchTerm;

/// `?page=&limit=&search=`. Values are kept raw so that malformed numbers
/// fall back to the defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-indexed page number, default 1.
    pub page: Option<String>,
    /// Page size, default 10, capped at 100.
    pub limit: Option<String>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
}

impl ListQuery {
    pub(crate) fn page_request(&self) -> PageRequest {
        PageRequest::lenient(self.page.as_deref(), self.limit.as_deref())
    }

    pub(crate) fn search_term(&self) -> Option<SearchTerm> {
        SearchTerm::parse(self.search.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some("3"), Some("5"), 3, 5)]
    #[case(Some("0"), Some("abc"), 1, 10)]
    #[case(Some("-2"), Some("1000"), 1, 100)]
    fn malformed_numbers_fall_back(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let query = ListQuery {
            page: page.map(str::to_owned),
            limit: limit.map(str::to_owned),
            search: None,
        };
        let request = query.page_request();
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[test]
    fn blank_search_is_no_filter() {
        let query = ListQuery {
            search: Some("  ".to_owned()),
            ..ListQuery::default()
        };
        assert!(query.search_term().is_none());
    }
}
