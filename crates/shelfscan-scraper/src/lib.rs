pub mod class_match;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pagination;
pub mod run;
pub mod throttle;
mod unwind;
pub mod walker;

pub use class_match::ClassPrefix;
pub use error::{FetchError, ScraperError};
pub use extract::{CardExtractor, CardFields, CardPatterns, PriceReading};
pub use fetch::{
    build_fetcher, AnyFetcher, BrowserProfileFetcher, HttpFetcher, PageFetcher, SessionFetcher,
};
#[cfg(feature = "browser")]
pub use fetch::HeadlessFetcher;
pub use pagination::{page_url, MAX_PAGE_BUDGET, PAGE_SIZE};
pub use run::{FailureKind, PageFailure, RunResult, StopReason};
pub use throttle::Throttle;
pub use walker::{CatalogWalker, SilentObserver, WalkObserver};
