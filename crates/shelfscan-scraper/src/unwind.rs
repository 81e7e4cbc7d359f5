//! Panic containment for page and card processing.

use std::panic::{self, AssertUnwindSafe};

/// Runs `process`, turning a panic into its message.
pub(crate) fn catch_panic<T>(process: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(process)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "processing panicked".to_owned())
    })
}
