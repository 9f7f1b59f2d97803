use url::Url;

/// Resolves a raw href against a base URL and normalizes the result.
///
/// # Normalization Steps
///
/// 1. Parse the href as a URL reference and resolve it against `base`
/// 2. Require the resulting scheme to be `http` or `https`
/// 3. Lowercase the host
/// 4. Strip the default port (80 for http, 443 for https)
/// 5. Empty path becomes `/`; otherwise the path is preserved verbatim
///    (trailing slashes kept, case kept, no percent-decoding)
/// 6. Clear the fragment
/// 7. Keep the query string byte-for-byte
///
/// Steps 3-5 fall out of the `url` crate's parser; this function adds the
/// scheme filter and fragment stripping on top.
///
/// Returns `None` for unparseable references and for schemes the crawler
/// cannot fetch (`mailto:`, `javascript:`, `ftp:`, `data:`, `tel:`, ...).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hostbound::url::sanitize;
///
/// let base = Url::parse("https://example.com/dir/page").unwrap();
/// assert_eq!(
///     sanitize("../about#team", &base),
///     Some("https://example.com/about".to_string())
/// );
/// assert_eq!(sanitize("mailto:a@example.com", &base), None);
/// ```
pub fn sanitize(href: &str, base: &Url) -> Option<String> {
    let mut resolved = base.join(href).ok()?;

    match resolved.scheme() {
        "http" | "https" => {}
        _ => return None,
    }

    resolved.set_fragment(None);

    Some(resolved.to_string())
}

/// Returns the canonical string form of an absolute URL for deduplication.
///
/// Applies the same normalization as [`sanitize`] to a URL already known to
/// be absolute. The key is what the visited set stores and what the output
/// prints, so the two can never disagree.
///
/// If the input does not parse it is returned unchanged; an unparseable
/// string can never match an in-scope candidate, so it is safely inert.
pub fn canonical_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
