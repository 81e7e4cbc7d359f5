//! Numeric page addressing for category listings.
//!
//! Category pages are addressed by appending a fixed page size and a 1-based
//! page number to the category URL:
//!
//! ```text
//! https://shop.example.com/c/snacks?limit=100&page=3
//! ```
//!
//! There is no cursor and no "next" link. The walker stops on the first page
//! that contains no product cards, or when the page budget runs out.

use crate::error::ScraperError;

/// Items requested per page. Fixed; the storefronts this targets accept 100.
pub const PAGE_SIZE: u32 = 100;

/// Largest page budget a caller may request for one run.
pub const MAX_PAGE_BUDGET: u32 = 100;

/// Builds the URL for 1-based `page` of the category at `base_url`.
///
/// Uses `&` instead of `?` when `base_url` already carries a query string.
#[must_use]
pub fn page_url(base_url: &str, page: u32) -> String {
    let base = base_url.trim();
    let separator = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{base}{separator}limit={PAGE_SIZE}&page={page}")
}

/// Checks the run preconditions: a non-blank absolute `http(s)` base URL and
/// a page budget in `1..=MAX_PAGE_BUDGET`.
///
/// # Errors
///
/// - [`ScraperError::InvalidBaseUrl`] for a blank or unparseable URL.
/// - [`ScraperError::InvalidPageBudget`] for a budget outside the range.
pub fn validate_run_input(base_url: &str, max_pages: u32) -> Result<(), ScraperError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "category URL is empty".to_string(),
        });
    }

    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }

    if !(1..=MAX_PAGE_BUDGET).contains(&max_pages) {
        return Err(ScraperError::InvalidPageBudget {
            max_pages,
            limit: MAX_PAGE_BUDGET,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_query_to_bare_category_url() {
        assert_eq!(
            page_url("https://shop.example.com/c/snacks", 1),
            "https://shop.example.com/c/snacks?limit=100&page=1"
        );
    }

    #[test]
    fn page_number_is_one_based_and_verbatim() {
        assert_eq!(
            page_url("https://shop.example.com/c/snacks", 42),
            "https://shop.example.com/c/snacks?limit=100&page=42"
        );
    }

    #[test]
    fn joins_with_ampersand_when_query_present() {
        assert_eq!(
            page_url("https://shop.example.com/search?q=rice", 2),
            "https://shop.example.com/search?q=rice&limit=100&page=2"
        );
    }

    #[test]
    fn trailing_question_mark_is_not_doubled() {
        assert_eq!(
            page_url("https://shop.example.com/c/snacks?", 3),
            "https://shop.example.com/c/snacks?limit=100&page=3"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            page_url("  https://shop.example.com/c/snacks \n", 1),
            "https://shop.example.com/c/snacks?limit=100&page=1"
        );
    }

    #[test]
    fn validate_rejects_blank_url() {
        let err = validate_run_input("   ", 5).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn validate_rejects_relative_url() {
        let err = validate_run_input("/c/snacks", 5).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let err = validate_run_input("ftp://shop.example.com/c/snacks", 5).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn validate_rejects_zero_and_oversized_budgets() {
        for budget in [0, 101] {
            let err = validate_run_input("https://shop.example.com/c/snacks", budget).unwrap_err();
            assert!(
                matches!(err, ScraperError::InvalidPageBudget { max_pages, limit: 100 } if max_pages == budget),
                "expected InvalidPageBudget for {budget}, got: {err:?}"
            );
        }
    }

    #[test]
    fn validate_accepts_budget_bounds() {
        assert!(validate_run_input("https://shop.example.com/c/snacks", 1).is_ok());
        assert!(validate_run_input("https://shop.example.com/c/snacks", 100).is_ok());
    }
}
