// src/crawl/normalize.rs
// =============================================================================
// Turns a raw href into the link reference we record and later probe.
//
// This is a purely lexical join. It does NOT resolve "..", strip queries or
// fragments, or treat "//host/path" specially, so two spellings of the same
// resource stay two separate entries.
// =============================================================================

/// Schemes recorded as-is. mailto and ftp are never probed successfully but
/// still show up in the report.
const ABSOLUTE_SCHEMES: [&str; 4] = ["mailto", "http", "https", "ftp"];

/// Builds the link reference for `href` found on the page at `base`.
///
/// Examples:
///   ("http://example.com",  "/about")         -> "http://example.com/about"
///   ("http://example.com/", "about")          -> "http://example.com/about"
///   ("http://example.com/", "/about")         -> "http://example.com/about"
///   (anything,              "mailto:a@b.com") -> "mailto:a@b.com"
pub fn normalize_reference(base: &str, href: &str) -> String {
    let scheme = href.split(':').next().unwrap_or_default();
    if ABSOLUTE_SCHEMES.contains(&scheme) {
        return href.to_string();
    }

    let base_has_slash = base.ends_with('/');
    let href_has_slash = href.starts_with('/');

    match (base_has_slash, href_has_slash) {
        (false, false) => format!("{}/{}", base, href),
        (true, true) => format!("{}{}", &base[..base.len() - 1], href),
        _ => format!("{}{}", base, href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_on_bare_host() {
        assert_eq!(
            normalize_reference("http://example.com", "/about"),
            "http://example.com/about"
        );
    }

    #[test]
    fn test_relative_path_on_trailing_slash() {
        assert_eq!(
            normalize_reference("http://example.com/", "about"),
            "http://example.com/about"
        );
    }

    #[test]
    fn test_double_slash_is_collapsed() {
        assert_eq!(
            normalize_reference("http://example.com/", "/about"),
            "http://example.com/about"
        );
    }

    #[test]
    fn test_missing_slash_is_inserted() {
        assert_eq!(
            normalize_reference("http://example.com/docs", "intro.html"),
            "http://example.com/docs/intro.html"
        );
    }

    #[test]
    fn test_absolute_schemes_pass_through() {
        for href in [
            "mailto:a@b.com",
            "http://other.org/x",
            "https://other.org/y/",
            "ftp://files.example.com/pub",
        ] {
            assert_eq!(normalize_reference("http://example.com/", href), href);
            assert_eq!(normalize_reference("whatever", href), href);
        }
    }

    #[test]
    fn test_scheme_match_is_exact() {
        // Only the exact lowercase names are routed; anything else is joined.
        assert_eq!(
            normalize_reference("http://example.com", "HTTP://upper.example.com"),
            "http://example.com/HTTP://upper.example.com"
        );
        assert_eq!(
            normalize_reference("http://example.com", "javascript:void(0)"),
            "http://example.com/javascript:void(0)"
        );
    }

    #[test]
    fn test_no_segment_or_fragment_handling() {
        assert_eq!(
            normalize_reference("http://example.com/a/", "../b?q=1#top"),
            "http://example.com/a/../b?q=1#top"
        );
        assert_eq!(
            normalize_reference("http://example.com", "//cdn.example.com/lib.js"),
            "http://example.com//cdn.example.com/lib.js"
        );
    }

    #[test]
    fn test_fragment_only_href() {
        assert_eq!(
            normalize_reference("http://example.com", "#section"),
            "http://example.com/#section"
        );
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let first = normalize_reference("https://example.com/base", "page");
        let second = normalize_reference("https://example.com/base", "page");
        assert_eq!(first, second);
    }
}
