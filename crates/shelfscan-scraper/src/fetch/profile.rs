use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use super::{read_html, PageFetcher};
use crate::error::{FetchError, ScraperError};

pub(crate) const BROWSER_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Request headers a desktop Chrome on Windows sends for a top-level
/// navigation. Bot filters in front of storefronts compare against these.
const CHROME_NAVIGATION_HEADERS: [(&str, &str); 10] = [
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
    ),
    ("accept-language", "th-TH,th;q=0.9,en-US;q=0.8,en;q=0.7"),
    (
        "sec-ch-ua",
        "\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

/// Fetcher that presents a desktop Chrome request profile (user agent,
/// client hints, fetch metadata, compressed transfer) and keeps cookies, so
/// challenge cookies issued by an anti-bot layer are replayed on later pages.
pub struct BrowserProfileFetcher {
    client: Client,
}

impl BrowserProfileFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(BROWSER_UA)
            .default_headers(chrome_headers())
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

fn chrome_headers() -> HeaderMap {
    CHROME_NAVIGATION_HEADERS
        .iter()
        .map(|&(name, value)| {
            (
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            )
        })
        .collect()
}

impl PageFetcher for BrowserProfileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        read_html(self.client.get(url), url).await
    }
}
