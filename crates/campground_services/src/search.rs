/// Escapes LIKE metacharacters so user input matches literally.
///
/// Backslash must be escaped first, then `%` and `_`. The resulting string is
/// safe to embed in a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like_pattern(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Builds the substring pattern for a name search.
pub fn substring_pattern(query: &str) -> String {
    format!("%{}%", escape_like_pattern(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(escape_like_pattern("Yosemite"), "Yosemite");
    }

    #[test]
    fn test_percent_and_underscore_are_escaped() {
        assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
    }

    #[test]
    fn test_backslash_is_escaped_before_wildcards() {
        assert_eq!(escape_like_pattern("a\\%b"), "a\\\\\\%b");
    }

    #[test]
    fn test_substring_pattern_wraps_with_wildcards() {
        assert_eq!(substring_pattern("camp_site"), "%camp\\_site%");
    }
}
