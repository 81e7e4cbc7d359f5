//! The outcome of one catalog walk.

use chrono::{DateTime, Local};
use shelfscan_core::ProductRecord;

use crate::error::FetchError;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `empty_page` had no product cards; the catalog ends before it.
    EndOfCatalog { empty_page: u32 },
    /// Every page in the budget was requested.
    BudgetExhausted,
}

/// Coarse classification of a skipped page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Non-success HTTP status.
    Status(u16),
    Timeout,
    /// Connection, TLS or browser failure.
    Transport,
    /// The page arrived but processing it failed unexpectedly.
    Extraction,
}

/// A page that contributed no records because fetching or processing it
/// failed. The walk continues with the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl PageFailure {
    pub(crate) fn from_fetch(page: u32, err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Status { status, .. } => FailureKind::Status(*status),
            FetchError::Timeout { .. } => FailureKind::Timeout,
            FetchError::Http { .. } | FetchError::Browser { .. } => FailureKind::Transport,
        };
        Self {
            page,
            url: err.url().to_owned(),
            kind,
            reason: err.to_string(),
        }
    }

    pub(crate) fn extraction(page: u32, url: &str, reason: String) -> Self {
        Self {
            page,
            url: url.to_owned(),
            kind: FailureKind::Extraction,
            reason,
        }
    }
}

/// Records of one run in page-then-document order, plus page accounting.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Run start time; every record carries the same value.
    pub scraped_at: DateTime<Local>,
    pub records: Vec<ProductRecord>,
    /// Number of page fetches attempted, failed ones included.
    pub pages_requested: u32,
    pub failed_pages: Vec<PageFailure>,
    pub stop: StopReason,
}

impl RunResult {
    pub(crate) fn new(scraped_at: DateTime<Local>) -> Self {
        Self {
            scraped_at,
            records: Vec::new(),
            pages_requested: 0,
            failed_pages: Vec::new(),
            stop: StopReason::BudgetExhausted,
        }
    }

    /// `true` when no record was extracted. Still a successful run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Last page number before the catalog ended, when the run stopped on an
    /// empty page. `Some(0)` means the very first page was already empty.
    #[must_use]
    pub fn last_catalog_page(&self) -> Option<u32> {
        match self.stop {
            StopReason::EndOfCatalog { empty_page } => Some(empty_page.saturating_sub(1)),
            StopReason::BudgetExhausted => None,
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }
}
