/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Treat an empty query parameter as absent.
pub fn non_empty(param: Option<String>) -> Option<String> {
    param.filter(|s| !s.is_empty())
}
