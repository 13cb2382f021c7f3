//! How a query value is compared against a record's field.

/// Comparison used by [`Collection::find_by_field`](crate::Collection::find_by_field).
///
/// Fixed per exposed query; callers of a resource never pick it.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole-string, case-sensitive equality.
    Exact,
    /// Field contains the value, ignoring case.
    ContainsIgnoreCase,
    /// Field starts with the value, case-sensitive.
    Prefix,
}

impl MatchMode {
    /// `true` if `candidate` (the stored field) satisfies `needle`.
    #[must_use]
    pub fn matches(self, candidate: &str, needle: &str) -> bool {
        match self {
            MatchMode::Exact => candidate == needle,
            MatchMode::ContainsIgnoreCase => candidate
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            MatchMode::Prefix => candidate.starts_with(needle),
        }
    }
}
