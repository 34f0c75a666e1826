//! Free-text search terms for list queries.

use super::Role;

/// Trimmed, non-empty search term.
///
/// Matching is a case-insensitive substring test over the fields each list
/// declares. Blank input means "no filter".
///
/// # Examples
/// ```
/// use bitacora::domain::SearchTerm;
///
/// assert!(SearchTerm::parse(Some("   ")).is_none());
/// let term = SearchTerm::parse(Some(" Philips ")).expect("term");
/// assert!(term.matches("Monitor PHILIPS IntelliVue"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Parse an optional query-string value.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// Term as entered, trimmed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Role whose name equals the term, ignoring case.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::match_term(&self.raw)
    }

    /// Case-insensitive substring test.
    #[must_use]
    pub fn matches(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.folded)
    }

    /// SQL `ILIKE` pattern with wildcard characters in the term escaped.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.raw.len() + 2);
        pattern.push('%');
        for c in self.raw.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  \t "))]
    fn blank_terms_mean_no_filter(#[case] raw: Option<&str>) {
        assert!(SearchTerm::parse(raw).is_none());
    }

    #[rstest]
    #[case("admin", Some(Role::Admin))]
    #[case("TECNICO", Some(Role::Tecnico))]
    #[case("tec", None)]
    fn detects_role_names(#[case] raw: &str, #[case] expected: Option<Role>) {
        let term = SearchTerm::parse(Some(raw)).expect("term");
        assert_eq!(term.role(), expected);
    }

    #[test]
    fn escapes_like_wildcards() {
        let term = SearchTerm::parse(Some("50%_off\\")).expect("term");
        assert_eq!(term.like_pattern(), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn matches_ignoring_case() {
        let term = SearchTerm::parse(Some("uci")).expect("term");
        assert!(term.matches("Sala UCI 3"));
        assert!(!term.matches("Urgencias"));
    }
}
