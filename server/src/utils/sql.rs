//! SQL utility functions

/// Escape LIKE metacharacters (%, _, \) so user text matches literally
///
/// Pair with `ESCAPE '\'` in the generated clause.
///
/// # Example
///
/// ```
/// use nestmate_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("50%_off"));
/// assert_eq!(pattern, "%50\\%\\_off%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_like_pattern("Austin"), "Austin");
        assert_eq!(escape_like_pattern(""), "");
    }

    #[test]
    fn test_metacharacters_escaped() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("room_2"), "room\\_2");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
        assert_eq!(escape_like_pattern("%_\\"), "\\%\\_\\\\");
    }
}
