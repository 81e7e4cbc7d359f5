use std::path::PathBuf;
use std::str::FromStr;

/// How category pages are fetched.
///
/// All strategies feed the same extraction engine; they differ only in how
/// the page HTML is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Plain HTTP client with the configured `User-Agent`.
    Plain,
    /// HTTP client with a cookie jar warmed by one request to the site origin.
    Session,
    /// Cookie-jar client presenting a desktop Chrome request profile.
    Stealth,
    /// Headless Chromium render (requires the `browser` feature).
    Headless,
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::Plain => write!(f, "plain"),
            FetchStrategy::Session => write!(f, "session"),
            FetchStrategy::Stealth => write!(f, "stealth"),
            FetchStrategy::Headless => write!(f, "headless"),
        }
    }
}

impl FromStr for FetchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(FetchStrategy::Plain),
            "session" => Ok(FetchStrategy::Session),
            "stealth" => Ok(FetchStrategy::Stealth),
            "headless" => Ok(FetchStrategy::Headless),
            other => Err(format!(
                "unknown fetch strategy \"{other}\"; expected plain, session, stealth or headless"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub fetch_strategy: FetchStrategy,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub output_dir: PathBuf,
    /// Chromium executable for the headless strategy. `None` means search
    /// the usual install locations.
    pub chrome_path: Option<PathBuf>,
}
