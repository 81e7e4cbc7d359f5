use std::time::Duration;

use reqwest::Client;

use super::{read_html, PageFetcher, HTML_ACCEPT};
use crate::error::{FetchError, ScraperError};

/// Plain HTTP fetcher: one client, configured `User-Agent`, no cookies.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, HTML_ACCEPT);
        read_html(request, url).await
    }
}
