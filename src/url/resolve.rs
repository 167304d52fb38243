use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only hrefs (same page anchors)
/// - Invalid URLs
/// - Schemes other than http, https and file after resolution
///
/// Fragments are stripped so `page#a` and `page#b` resolve to one URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use word_tally::url::resolve_link;
///
/// let base = Url::parse("https://example.com/dir/page").unwrap();
/// assert_eq!(
///     resolve_link("other#top", &base),
///     Some("https://example.com/dir/other".to_string())
/// );
/// assert_eq!(resolve_link("mailto:me@example.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" | "file" => {
            absolute_url.set_fragment(None);
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
