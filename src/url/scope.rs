use url::Url;

/// Returns true if the URL's hostname matches the start host.
///
/// The comparison is an exact, case-insensitive hostname match: subdomains,
/// parent domains, and sibling hosts are all out of scope. Ports and schemes
/// are deliberately ignored. Unparseable URLs are never in scope.
pub fn in_scope(url: &str, start_host: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.eq_ignore_ascii_case(start_host),
            None => false,
        },
        Err(_) => false,
    }
}

/// Extracts the lowercase hostname from a parsed URL.
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
