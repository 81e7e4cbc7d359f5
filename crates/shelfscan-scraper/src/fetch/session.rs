use std::time::Duration;

use reqwest::Client;
use tokio::sync::OnceCell;

use super::{extract_site_origin, read_html, PageFetcher, HTML_ACCEPT};
use crate::error::{FetchError, ScraperError};

/// Cookie-jar fetcher that visits the site origin once before the first
/// page, so session and consent cookies set by the home page are sent with
/// every category request.
pub struct SessionFetcher {
    client: Client,
    warmed: OnceCell<()>,
}

impl SessionFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            warmed: OnceCell::new(),
        })
    }

    /// Best-effort origin visit. Failure only costs the cookies.
    async fn warm_up(&self, page_url: &str) {
        let Some(origin) = extract_site_origin(page_url) else {
            return;
        };

        match self
            .client
            .get(&origin)
            .header(reqwest::header::ACCEPT, HTML_ACCEPT)
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!(%origin, status = response.status().as_u16(), "session warmed");
            }
            Err(e) => {
                tracing::warn!(%origin, error = %e, "session warm-up failed; continuing without cookies");
            }
        }
    }
}

impl PageFetcher for SessionFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.warmed.get_or_init(|| self.warm_up(url)).await;

        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, HTML_ACCEPT);
        read_html(request, url).await
    }
}
