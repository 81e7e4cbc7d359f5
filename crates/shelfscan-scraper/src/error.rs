use thiserror::Error;

/// Run-level errors. Anything in here stops a run before its first fetch.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("page budget {max_pages} is outside 1..={limit}")]
    InvalidPageBudget { max_pages: u32, limit: u32 },

    #[error("fetch strategy {strategy} is unavailable: {reason}")]
    StrategyUnavailable { strategy: String, reason: String },

    #[error("browser error: {0}")]
    Browser(String),
}

/// Failure to obtain one page's HTML.
///
/// The walker treats every variant the same way: the page is recorded as
/// failed and skipped. The variants exist so callers can tell a server
/// answer apart from a transport problem.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("transport error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("browser could not render {url}: {reason}")]
    Browser { url: String, reason: String },
}

impl FetchError {
    /// Classifies a `reqwest` error, folding client-side timeouts into
    /// [`FetchError::Timeout`].
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_owned(),
            }
        } else {
            FetchError::Http {
                url: url.to_owned(),
                source,
            }
        }
    }

    /// The page URL this error belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Http { url, .. }
            | FetchError::Browser { url, .. } => url,
        }
    }
}
