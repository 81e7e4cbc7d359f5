//! Page fetch strategies.
//!
//! The walker only needs "give me the HTML at this URL". [`PageFetcher`] is
//! that capability; the strategies below differ in how hard they try to look
//! like a real browser.

#[cfg(feature = "browser")]
mod headless;
mod http;
mod origin;
mod profile;
mod session;
#[cfg(any(feature = "browser", test))]
mod tab;

use std::future::Future;
use std::time::Duration;

use shelfscan_core::{AppConfig, FetchStrategy};

use crate::error::{FetchError, ScraperError};

#[cfg(feature = "browser")]
pub use headless::HeadlessFetcher;
pub use http::HttpFetcher;
pub use origin::extract_site_origin;
pub use profile::BrowserProfileFetcher;
pub use session::SessionFetcher;

pub(crate) const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetches the raw HTML of a fully formed page URL.
///
/// Implementations report non-2xx responses as [`FetchError::Status`] and
/// network problems as [`FetchError::Http`] or [`FetchError::Timeout`].
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>>;
}

impl<T: PageFetcher> PageFetcher for &T {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url).await
    }
}

/// Runtime-selected fetch strategy.
pub enum AnyFetcher {
    Plain(HttpFetcher),
    Session(SessionFetcher),
    Stealth(BrowserProfileFetcher),
    #[cfg(feature = "browser")]
    Headless(HeadlessFetcher),
}

impl AnyFetcher {
    #[must_use]
    pub fn strategy(&self) -> FetchStrategy {
        match self {
            AnyFetcher::Plain(_) => FetchStrategy::Plain,
            AnyFetcher::Session(_) => FetchStrategy::Session,
            AnyFetcher::Stealth(_) => FetchStrategy::Stealth,
            #[cfg(feature = "browser")]
            AnyFetcher::Headless(_) => FetchStrategy::Headless,
        }
    }
}

impl PageFetcher for AnyFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            AnyFetcher::Plain(fetcher) => fetcher.fetch(url).await,
            AnyFetcher::Session(fetcher) => fetcher.fetch(url).await,
            AnyFetcher::Stealth(fetcher) => fetcher.fetch(url).await,
            #[cfg(feature = "browser")]
            AnyFetcher::Headless(fetcher) => fetcher.fetch(url).await,
        }
    }
}

/// Builds the fetcher for `strategy` from the shared config.
///
/// # Errors
///
/// - [`ScraperError::Http`] if an HTTP client cannot be constructed.
/// - [`ScraperError::StrategyUnavailable`] for `headless` without the
///   `browser` feature.
/// - [`ScraperError::Browser`] if Chromium cannot be launched.
#[cfg_attr(not(feature = "browser"), allow(clippy::unused_async))]
pub async fn build_fetcher(
    strategy: FetchStrategy,
    config: &AppConfig,
) -> Result<AnyFetcher, ScraperError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    tracing::debug!(%strategy, ?timeout, "building page fetcher");

    match strategy {
        FetchStrategy::Plain => Ok(AnyFetcher::Plain(HttpFetcher::new(
            timeout,
            &config.user_agent,
        )?)),
        FetchStrategy::Session => Ok(AnyFetcher::Session(SessionFetcher::new(
            timeout,
            &config.user_agent,
        )?)),
        FetchStrategy::Stealth => Ok(AnyFetcher::Stealth(BrowserProfileFetcher::new(timeout)?)),
        #[cfg(feature = "browser")]
        FetchStrategy::Headless => Ok(AnyFetcher::Headless(
            HeadlessFetcher::launch(config.chrome_path.clone(), timeout).await?,
        )),
        #[cfg(not(feature = "browser"))]
        FetchStrategy::Headless => Err(ScraperError::StrategyUnavailable {
            strategy: strategy.to_string(),
            reason: "built without the `browser` feature".to_string(),
        }),
    }
}

/// Sends `request` and returns the body of a 2xx response.
pub(crate) async fn read_html(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    Ok(body.to_vec())
}
