//! Helpers for free-text search filters.

/// `%term%` for ILIKE, with the pattern metacharacters escaped so the term
/// matches literally.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("algo"), "%algo%");
        assert_eq!(like_pattern(" 100%_done "), "%100\\%\\_done%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
