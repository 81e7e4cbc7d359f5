//! Site origin extraction for session warm-up requests.

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://shop.example.com/c/snacks?limit=100&page=1"`, returns
/// `"https://shop.example.com"`. Returns `None` when the URL cannot be parsed
/// or has an opaque origin.
#[must_use]
pub fn extract_site_origin(url: &str) -> Option<String> {
    match reqwest::Url::parse(url) {
        Ok(parsed) => {
            let origin = parsed.origin();
            origin.is_tuple().then(|| origin.ascii_serialization())
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "could not parse page URL for origin extraction");
            None
        }
    }
}
