//! Headless Chromium fetcher for storefronts that only render cards client-side.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::tab::{render_deadline, render_within, CloseOnDrop};
use super::PageFetcher;
use crate::error::{FetchError, ScraperError};

/// Time given to client-side scripts after navigation before the DOM is read.
const RENDER_SETTLE: Duration = Duration::from_millis(1_500);

/// Renders each page in a fresh tab of one shared headless browser and
/// returns the resulting DOM serialized as HTML.
///
/// Every tab is closed once its page is done, even when the render fails or
/// the caller abandons the fetch.
pub struct HeadlessFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    render_deadline: Duration,
}

impl HeadlessFetcher {
    /// Launches Chromium. `chrome_path` overrides executable discovery.
    /// `request_timeout` should match the walker's page timeout; each render
    /// is cut off somewhat earlier so the tab can still be closed in time.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if the browser config is invalid or
    /// Chromium fails to start.
    pub async fn launch(
        chrome_path: Option<PathBuf>,
        request_timeout: Duration,
    ) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(request_timeout)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu");
        if let Some(path) = chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScraperError::Browser)?;

        tracing::info!("launching headless browser");
        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Browser(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            render_deadline: render_deadline(request_timeout),
        })
    }
}

fn render_error(url: &str, err: &impl std::fmt::Display) -> FetchError {
    FetchError::Browser {
        url: url.to_owned(),
        reason: err.to_string(),
    }
}

impl PageFetcher for HeadlessFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| render_error(url, &e))?;

        // If this future is dropped mid-render, close the tab in the background.
        let abandoned = page.clone();
        let mut guard = CloseOnDrop::new(move || {
            tokio::spawn(async move {
                if let Err(e) = abandoned.close().await {
                    tracing::debug!(error = %e, "failed to close abandoned browser tab");
                }
            });
        });

        let rendered = render_within(self.render_deadline, url, async {
            page.goto(url).await.map_err(|e| render_error(url, &e))?;
            tokio::time::sleep(RENDER_SETTLE).await;
            page.content().await.map_err(|e| render_error(url, &e))
        })
        .await;

        guard.disarm();
        if let Err(e) = page.close().await {
            tracing::debug!(url, error = %e, "failed to close browser tab");
        }
        rendered.map(String::into_bytes)
    }
}

impl Drop for HeadlessFetcher {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
