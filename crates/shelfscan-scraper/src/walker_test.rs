use std::collections::HashMap;
use std::sync::Mutex;

use chrono::TimeZone;

use super::*;
use crate::run::FailureKind;

const BASE: &str = "https://shop.example.com/c/dried-goods";

enum Reply {
    Html(String),
    Bytes(Vec<u8>),
    Status(u16),
    Hang,
}

/// Fetcher that answers from a per-page script and records every URL asked for.
struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<(u32, Reply)>) -> Self {
        Self {
            replies: pages
                .into_iter()
                .map(|(page, reply)| (page_url(BASE, page), reply))
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested_pages(&self) -> Vec<u32> {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .map(|url| {
                url.rsplit("page=")
                    .next()
                    .and_then(|n| n.parse().ok())
                    .unwrap()
            })
            .collect()
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requested.lock().unwrap().push(url.to_owned());
        match self.replies.get(url) {
            Some(Reply::Html(html)) => Ok(html.clone().into_bytes()),
            Some(Reply::Bytes(bytes)) => Ok(bytes.clone()),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_owned(),
            }),
            Some(Reply::Hang) => std::future::pending().await,
            None => Ok(empty_page().into_bytes()),
        }
    }
}

fn card(name: &str) -> String {
    format!(
        r#"<div class="productCard_container__h4sh">
             <img src="https://cdn.example.com/p/8850000000001_{name}.jpg">
             <p class="productCard_title__h4sh">{name}</p>
             <p class="productCard_price__h4sh">฿45</p>
           </div>"#
    )
}

fn listing(names: &[&str]) -> Reply {
    let cards: String = names.iter().map(|n| card(n)).collect();
    Reply::Html(format!("<html><body><main>{cards}</main></body></html>"))
}

fn empty_page() -> String {
    r#"<html><body><div class="emptyState_root__x">ไม่พบสินค้า</div></body></html>"#.to_owned()
}

fn run_start() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap()
}

fn walker(fetcher: &ScriptedFetcher) -> CatalogWalker<&ScriptedFetcher> {
    CatalogWalker::new(fetcher, run_start()).with_throttle(Throttle::none())
}

fn names(result: &RunResult) -> Vec<&str> {
    result.records.iter().map(|r| r.name.as_str()).collect()
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
}

impl WalkObserver for RecordingObserver {
    fn page_started(&mut self, page: u32, max_pages: u32) {
        self.events.push(format!("start {page}/{max_pages}"));
    }
    fn page_extracted(&mut self, page: u32, cards: usize) {
        self.events.push(format!("extracted {page}:{cards}"));
    }
    fn page_failed(&mut self, failure: &PageFailure) {
        self.events.push(format!("failed {}", failure.page));
    }
    fn catalog_ended(&mut self, empty_page: u32) {
        self.events.push(format!("end {empty_page}"));
    }
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_page_ends_run_before_budget() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, listing(&["a1", "a2"])),
        (2, listing(&["b1"])),
        (3, Reply::Html(empty_page())),
        (4, listing(&["never"])),
    ]);

    let result = walker(&fetcher).run(BASE, 10).await.unwrap();

    assert_eq!(names(&result), ["a1", "a2", "b1"]);
    assert_eq!(fetcher.requested_pages(), [1, 2, 3]);
    assert_eq!(result.stop, StopReason::EndOfCatalog { empty_page: 3 });
    assert_eq!(result.last_catalog_page(), Some(2));
    assert_eq!(result.pages_requested, 3);
}

#[tokio::test]
async fn empty_first_page_is_a_valid_empty_result() {
    let fetcher = ScriptedFetcher::new(vec![(1, Reply::Html(empty_page()))]);

    let result = walker(&fetcher).run(BASE, 5).await.unwrap();

    assert!(result.is_empty());
    assert!(result.failed_pages.is_empty());
    assert_eq!(result.stop, StopReason::EndOfCatalog { empty_page: 1 });
    assert_eq!(fetcher.requested_pages(), [1]);
}

#[tokio::test]
async fn budget_caps_the_run() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, listing(&["p1a", "p1b"])),
        (2, listing(&["p2a"])),
        (3, listing(&["p3a", "p3b"])),
        (4, listing(&["p4a"])),
    ]);

    let result = walker(&fetcher).run(BASE, 3).await.unwrap();

    assert_eq!(names(&result), ["p1a", "p1b", "p2a", "p3a", "p3b"]);
    assert_eq!(fetcher.requested_pages(), [1, 2, 3]);
    assert_eq!(result.stop, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn single_page_budget_fetches_once() {
    let fetcher = ScriptedFetcher::new(vec![(1, listing(&["only"])), (2, listing(&["no"]))]);

    let result = walker(&fetcher).run(BASE, 1).await.unwrap();

    assert_eq!(names(&result), ["only"]);
    assert_eq!(fetcher.requested_pages(), [1]);
}

// ---------------------------------------------------------------------------
// Fault isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_page_is_skipped_not_terminal() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, listing(&["p1"])),
        (2, listing(&["p2"])),
        (3, Reply::Status(503)),
        (4, listing(&["p4"])),
        (5, listing(&["p5"])),
    ]);

    let result = walker(&fetcher).run(BASE, 5).await.unwrap();

    assert_eq!(names(&result), ["p1", "p2", "p4", "p5"]);
    assert_eq!(fetcher.requested_pages(), [1, 2, 3, 4, 5]);
    assert_eq!(result.failed_pages.len(), 1);
    assert_eq!(result.failed_pages[0].page, 3);
    assert_eq!(result.failed_pages[0].kind, FailureKind::Status(503));
    assert_eq!(result.stop, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn failed_page_is_not_retried() {
    let fetcher = ScriptedFetcher::new(vec![(1, Reply::Status(500)), (2, listing(&["p2"]))]);

    let result = walker(&fetcher).run(BASE, 2).await.unwrap();

    assert_eq!(fetcher.requested_pages(), [1, 2]);
    assert_eq!(names(&result), ["p2"]);
}

#[tokio::test]
async fn every_page_failing_still_returns_ok() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, Reply::Status(403)),
        (2, Reply::Status(403)),
        (3, Reply::Status(403)),
    ]);

    let result = walker(&fetcher).run(BASE, 3).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.failed_pages.len(), 3);
    assert_eq!(result.stop, StopReason::BudgetExhausted);
}

#[tokio::test]
async fn hanging_fetch_times_out_and_walk_continues() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, Reply::Hang),
        (2, listing(&["after-timeout"])),
    ]);

    let result = walker(&fetcher)
        .with_page_timeout(Duration::from_millis(50))
        .run(BASE, 2)
        .await
        .unwrap();

    assert_eq!(names(&result), ["after-timeout"]);
    assert_eq!(result.failed_pages.len(), 1);
    assert_eq!(result.failed_pages[0].kind, FailureKind::Timeout);
}

#[tokio::test]
async fn non_utf8_bytes_are_decoded_lossily() {
    let mut bytes = card("lossy").into_bytes();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    let fetcher = ScriptedFetcher::new(vec![(1, Reply::Bytes(bytes))]);

    let result = walker(&fetcher).run(BASE, 1).await.unwrap();

    assert_eq!(names(&result), ["lossy"]);
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_record_carries_the_run_start_time() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, listing(&["a", "b"])),
        (2, listing(&["c"])),
        (3, listing(&["d", "e", "f"])),
    ]);

    let result = CatalogWalker::new(&fetcher, run_start())
        .with_throttle(Throttle::new(5, 10))
        .run(BASE, 3)
        .await
        .unwrap();

    assert_eq!(result.len(), 6);
    assert_eq!(result.scraped_at, run_start());
    assert!(result.records.iter().all(|r| r.scraped_at == run_start()));
}

#[tokio::test]
async fn cards_are_fully_extracted() {
    let fetcher = ScriptedFetcher::new(vec![(1, listing(&["rice"]))]);

    let result = walker(&fetcher).run(BASE, 1).await.unwrap();

    let record = &result.records[0];
    assert_eq!(record.name, "rice");
    assert_eq!(record.barcode, "8850000000001");
    assert_eq!(record.promotion_price, "45");
    assert_eq!(record.normal_price, "45");
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_base_url_is_rejected_before_any_fetch() {
    let fetcher = ScriptedFetcher::new(vec![]);

    let err = walker(&fetcher).run("  ", 5).await.unwrap_err();

    assert!(matches!(err, ScraperError::InvalidBaseUrl { .. }));
    assert!(fetcher.requested_pages().is_empty());
}

#[tokio::test]
async fn out_of_range_budget_is_rejected_before_any_fetch() {
    let fetcher = ScriptedFetcher::new(vec![]);

    let err = walker(&fetcher).run(BASE, 0).await.unwrap_err();

    assert!(matches!(err, ScraperError::InvalidPageBudget { .. }));
    assert!(fetcher.requested_pages().is_empty());
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn observer_sees_every_page_event_in_order() {
    let fetcher = ScriptedFetcher::new(vec![
        (1, listing(&["a"])),
        (2, Reply::Status(502)),
        (3, Reply::Html(empty_page())),
    ]);
    let mut observer = RecordingObserver::default();

    walker(&fetcher)
        .run_with_observer(BASE, 5, &mut observer)
        .await
        .unwrap();

    assert_eq!(
        observer.events,
        [
            "start 1/5",
            "extracted 1:1",
            "start 2/5",
            "failed 2",
            "start 3/5",
            "end 3",
        ]
    );
}
