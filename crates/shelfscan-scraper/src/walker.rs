//! Page-by-page catalog traversal.
//!
//! Pages are walked strictly in order: page `n + 1` is not requested until
//! every card of page `n` has been extracted and appended. The run ends on
//! the first page with no cards or when the page budget is used up. Pages
//! that fail to fetch or process are recorded and skipped; they never end
//! the run and are never retried.

use std::time::Duration;

use chrono::{DateTime, Local};
use shelfscan_core::ProductRecord;

use crate::error::{FetchError, ScraperError};
use crate::extract::CardExtractor;
use crate::fetch::PageFetcher;
use crate::pagination::{page_url, validate_run_input};
use crate::run::{PageFailure, RunResult, StopReason};
use crate::throttle::Throttle;
use crate::unwind::catch_panic;

/// Default upper bound for a single page fetch.
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(20);

/// Receives progress events from a walk. Every method defaults to a no-op.
pub trait WalkObserver {
    fn page_started(&mut self, _page: u32, _max_pages: u32) {}
    fn page_extracted(&mut self, _page: u32, _cards: usize) {}
    fn page_failed(&mut self, _failure: &PageFailure) {}
    fn catalog_ended(&mut self, _empty_page: u32) {}
}

/// Observer that ignores every event.
pub struct SilentObserver;

impl WalkObserver for SilentObserver {}

/// Walks one category for one run.
///
/// The run timestamp is fixed at construction and stamped on every record,
/// and [`Self::run`] consumes the walker, so each walker serves exactly one
/// run.
pub struct CatalogWalker<F> {
    fetcher: F,
    extractor: CardExtractor,
    throttle: Throttle,
    page_timeout: Duration,
    scraped_at: DateTime<Local>,
}

impl<F: PageFetcher> CatalogWalker<F> {
    #[must_use]
    pub fn new(fetcher: F, scraped_at: DateTime<Local>) -> Self {
        Self {
            fetcher,
            extractor: CardExtractor::default(),
            throttle: Throttle::default(),
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            scraped_at,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: CardExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    #[must_use]
    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    /// Walks `base_url` for at most `max_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] or
    /// [`ScraperError::InvalidPageBudget`] before any request is made. Once
    /// the walk starts it always returns `Ok`, with whatever was collected.
    pub async fn run(self, base_url: &str, max_pages: u32) -> Result<RunResult, ScraperError> {
        self.run_with_observer(base_url, max_pages, &mut SilentObserver)
            .await
    }

    /// Same as [`Self::run`], reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn run_with_observer(
        self,
        base_url: &str,
        max_pages: u32,
        observer: &mut dyn WalkObserver,
    ) -> Result<RunResult, ScraperError> {
        validate_run_input(base_url, max_pages)?;

        let mut result = RunResult::new(self.scraped_at);
        tracing::info!(base_url, max_pages, "catalog walk started");

        for page in 1..=max_pages {
            let url = page_url(base_url, page);
            observer.page_started(page, max_pages);
            result.pages_requested += 1;

            let body = match self.fetch_page(&url).await {
                Ok(body) => body,
                Err(err) => {
                    let failure = PageFailure::from_fetch(page, &err);
                    tracing::warn!(page, url = %url, error = %err, "page fetch failed; skipping page");
                    observer.page_failed(&failure);
                    result.failed_pages.push(failure);
                    continue;
                }
            };

            let records = match self.extract_page(&body) {
                Ok(records) => records,
                Err(reason) => {
                    let failure = PageFailure::extraction(page, &url, reason);
                    tracing::error!(page, url = %url, reason = %failure.reason, "page processing failed; skipping page");
                    observer.page_failed(&failure);
                    result.failed_pages.push(failure);
                    continue;
                }
            };

            if records.is_empty() {
                tracing::info!(page, "no product cards found; end of catalog");
                observer.catalog_ended(page);
                result.stop = StopReason::EndOfCatalog { empty_page: page };
                break;
            }

            tracing::info!(page, cards = records.len(), "page extracted");
            observer.page_extracted(page, records.len());
            result.records.extend(records);

            if page < max_pages {
                self.throttle.pause().await;
            }
        }

        tracing::info!(
            records = result.records.len(),
            pages_requested = result.pages_requested,
            failed_pages = result.failed_pages.len(),
            stop = ?result.stop,
            "catalog walk finished"
        );
        Ok(result)
    }

    async fn fetch_page(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match tokio::time::timeout(self.page_timeout, self.fetcher.fetch(url)).await {
            Ok(fetched) => fetched,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_owned(),
            }),
        }
    }

    fn extract_page(&self, body: &[u8]) -> Result<Vec<ProductRecord>, String> {
        let html = String::from_utf8_lossy(body);
        catch_panic(|| self.extractor.extract_page(&html, self.scraped_at))
    }
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod tests;
