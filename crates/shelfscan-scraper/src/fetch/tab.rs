//! Lifetime helpers for browser tabs.
//!
//! A tab must be closed however its render ends, including when the walker
//! drops the fetch future because its own page timeout fired. The render
//! gets a deadline shorter than the page timeout so the normal path can
//! still close the tab itself; the drop guard covers cancellation.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Runs its closure on drop unless [`Self::disarm`] was called first.
pub(crate) struct CloseOnDrop<F: FnOnce()> {
    on_drop: Option<F>,
}

impl<F: FnOnce()> CloseOnDrop<F> {
    pub(crate) fn new(on_drop: F) -> Self {
        Self {
            on_drop: Some(on_drop),
        }
    }

    /// The caller has taken over closing.
    pub(crate) fn disarm(&mut self) {
        self.on_drop = None;
    }
}

impl<F: FnOnce()> Drop for CloseOnDrop<F> {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}

/// Render budget for a page fetched under `page_timeout`: four fifths of it,
/// leaving the rest for closing the tab.
pub(crate) fn render_deadline(page_timeout: Duration) -> Duration {
    page_timeout - page_timeout / 5
}

/// Awaits `render` for at most `deadline`.
pub(crate) async fn render_within<T>(
    deadline: Duration,
    url: &str,
    render: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    tokio::time::timeout(deadline, render)
        .await
        .unwrap_or_else(|_| {
            Err(FetchError::Timeout {
                url: url.to_owned(),
            })
        })
}
