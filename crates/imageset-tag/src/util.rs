//! URL helpers shared by the HTML backend and file lookups.

/// Check whether a locator is already a usable URL.
///
/// True for URLs with a scheme (`https:`, `mailto:`, `data:`), protocol-relative
/// URLs (`//cdn`), root-relative paths (`/files/a.jpg`) and fragments (`#top`).
///
/// # Examples
///
/// ```
/// use imageset_tag::is_url;
///
/// assert!(is_url("https://example.com/a.jpg"));
/// assert!(is_url("/files/a.jpg"));
/// assert!(!is_url("a.jpg"));
/// assert!(!is_url("gallery/a.jpg"));
/// ```
pub fn is_url(locator: &str) -> bool {
    locator.starts_with('/') || locator.starts_with('#') || has_scheme(locator)
}

/// RFC 3986 scheme: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`
fn has_scheme(locator: &str) -> bool {
    let Some(colon) = locator.find(':') else {
        return false;
    };
    let scheme = &locator[..colon];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalize a locator into a URL against the site base URL.
///
/// URLs (see [`is_url`]) and empty strings are returned unchanged. Anything
/// else is treated as relative to `base` and joined with a single `/`.
/// Applying the function twice gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// use imageset_tag::normalize_url;
///
/// assert_eq!(normalize_url("https://example.com/", "a.jpg"), "https://example.com/a.jpg");
/// assert_eq!(normalize_url("https://example.com", "https://cdn.test/a.jpg"), "https://cdn.test/a.jpg");
/// assert_eq!(normalize_url("", "a.jpg"), "/a.jpg");
/// ```
pub fn normalize_url(base: &str, raw: &str) -> String {
    if raw.is_empty() || is_url(raw) {
        return raw.to_owned();
    }

    let path = raw.trim_start_matches("./");
    let base = base.trim_end_matches('/');
    format!("{base}/{path}")
}
