//! Randomized pause between page requests.
//!
//! Pages are requested one at a time and the walker sleeps a uniformly random
//! duration between consecutive pages so the request pattern does not look
//! machine-regular. The pause is awaited on the walking task itself.

use std::time::Duration;

use rand::Rng;
use shelfscan_core::AppConfig;

/// Uniform random delay in `[min_ms, max_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    min_ms: u64,
    max_ms: u64,
}

impl Throttle {
    /// Creates a throttle. Bounds given in the wrong order are swapped.
    #[must_use]
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// A throttle that never sleeps.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    #[must_use]
    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }

    /// Draws the next delay.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }

    /// Sleeps for [`Self::next_delay`]. Returns immediately for a zero delay.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!(?delay, "throttling before next page");
        tokio::time::sleep(delay).await;
    }
}

impl Default for Throttle {
    /// One to two seconds between pages.
    fn default() -> Self {
        Self::new(1_000, 2_000)
    }
}
