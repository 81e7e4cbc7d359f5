//! Human-readable progress lines for the `scrape` command.

use std::io::{self, Write};

use shelfscan_scraper::{PageFailure, WalkObserver};

/// Prints one line per walk event to `out`. Write errors are ignored; losing a
/// progress line must not end the run.
pub(crate) struct ConsoleProgress<W> {
    out: W,
}

impl ConsoleProgress<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleProgress<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> WalkObserver for ConsoleProgress<W> {
    fn page_started(&mut self, page: u32, max_pages: u32) {
        let _ = writeln!(self.out, "page {page}/{max_pages}");
    }

    fn page_extracted(&mut self, _page: u32, cards: usize) {
        let _ = writeln!(self.out, "  {cards} products");
    }

    fn page_failed(&mut self, failure: &PageFailure) {
        let _ = writeln!(
            self.out,
            "  warning: skipping page {}: {}",
            failure.page, failure.reason
        );
    }

    fn catalog_ended(&mut self, empty_page: u32) {
        let _ = if empty_page > 1 {
            writeln!(self.out, "end of catalog after page {}", empty_page - 1)
        } else {
            writeln!(self.out, "no product cards on the first page")
        };
    }
}
