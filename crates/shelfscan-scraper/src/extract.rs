//! Per-card field extraction.
//!
//! Every field is read independently and may be absent. Absence is kept as
//! `None` (or [`PriceReading::NoContainer`]) in [`CardFields`] and only turned
//! into the `"N/A"` / empty-string sentinels when the [`ProductRecord`] is
//! built, so a card never disappears because one of its parts is missing.

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use shelfscan_core::{ProductRecord, NOT_AVAILABLE};

use crate::class_match::ClassPrefix;
use crate::discovery::{discover_cards, first_with_prefix};
use crate::unwind::catch_panic;

/// First run of 8 to 14 ASCII digits, e.g. the EAN-13 in
/// `.../8850123456789_front.jpg`.
static BARCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8,14}").expect("valid barcode regex"));

/// Maximal run of digits and commas containing at least one digit. `\d` is
/// Unicode-aware, so Thai numerals count as digits.
static PRICE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]*\d[\d,]*").expect("valid price token regex"));

static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));

/// Class prefixes identifying a card and its title and price blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPatterns {
    pub card: ClassPrefix,
    pub title: ClassPrefix,
    pub price: ClassPrefix,
}

impl Default for CardPatterns {
    fn default() -> Self {
        Self {
            card: ClassPrefix::new("productCard_container_"),
            title: ClassPrefix::new("productCard_title_"),
            price: ClassPrefix::new("productCard_price_"),
        }
    }
}

/// What the price block of a card said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceReading {
    /// The card has no price block.
    NoContainer,
    /// The price block has no numeric token.
    NoTokens,
    /// One price: the product is not on promotion.
    Single(String),
    /// Two or more prices. The promotion price is printed first.
    Pair { promotion: String, normal: String },
}

impl PriceReading {
    /// Applies the price decision table to the tokens of a price block.
    /// Tokens beyond the second are ignored.
    #[must_use]
    pub fn from_tokens(tokens: &[&str]) -> Self {
        match tokens {
            [] => PriceReading::NoTokens,
            [only] => PriceReading::Single((*only).to_owned()),
            [promotion, normal, ..] => PriceReading::Pair {
                promotion: (*promotion).to_owned(),
                normal: (*normal).to_owned(),
            },
        }
    }

    /// Returns `(promotion_price, normal_price)` with sentinels applied.
    #[must_use]
    pub fn into_prices(self) -> (String, String) {
        match self {
            PriceReading::NoContainer | PriceReading::NoTokens => {
                (NOT_AVAILABLE.to_owned(), NOT_AVAILABLE.to_owned())
            }
            PriceReading::Single(price) => (price.clone(), price),
            PriceReading::Pair { promotion, normal } => (promotion, normal),
        }
    }
}

/// Fields read from one card, before sentinel substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    pub prices: PriceReading,
}

impl CardFields {
    /// Fields of a card nothing could be read from.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            name: None,
            image_url: None,
            barcode: None,
            prices: PriceReading::NoContainer,
        }
    }

    /// Builds the exported record, stamping it with the run's start time.
    #[must_use]
    pub fn into_record(self, scraped_at: DateTime<Local>) -> ProductRecord {
        let (promotion_price, normal_price) = self.prices.into_prices();
        ProductRecord {
            scraped_at,
            name: self.name.unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
            image_url: self.image_url.unwrap_or_default(),
            barcode: self.barcode.unwrap_or_default(),
            normal_price,
            promotion_price,
        }
    }
}

/// Turns listing markup into [`ProductRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct CardExtractor {
    patterns: CardPatterns,
}

impl CardExtractor {
    #[must_use]
    pub fn new(patterns: CardPatterns) -> Self {
        Self { patterns }
    }

    #[must_use]
    pub fn patterns(&self) -> &CardPatterns {
        &self.patterns
    }

    /// Extracts one record per card found in a full page, in document order.
    /// An empty result means the page had no cards.
    #[must_use]
    pub fn extract_page(&self, html: &str, scraped_at: DateTime<Local>) -> Vec<ProductRecord> {
        let document = Html::parse_document(html);
        discover_cards(&document, &self.patterns.card)
            .into_iter()
            .map(|card| guard_card(|| self.read_card(card)).into_record(scraped_at))
            .collect()
    }

    /// Reads a standalone card fragment such as
    /// `<div class="productCard_container__a">…</div>`.
    #[must_use]
    pub fn extract_fragment(&self, fragment: &str) -> CardFields {
        let html = Html::parse_fragment(fragment);
        self.read_card(html.root_element())
    }

    /// Reads all fields below `card`.
    #[must_use]
    pub fn read_card(&self, card: ElementRef<'_>) -> CardFields {
        let name = first_with_prefix(card, &self.patterns.title).map(|el| normalized_text(&el));

        let image_url = card.select(&IMG).next().and_then(|img| image_source(&img));
        let barcode = image_url
            .as_deref()
            .and_then(find_barcode)
            .map(str::to_owned);

        let prices = match first_with_prefix(card, &self.patterns.price) {
            None => PriceReading::NoContainer,
            Some(container) => {
                let text = normalized_text(&container);
                PriceReading::from_tokens(&price_tokens(&text))
            }
        };

        CardFields {
            name,
            image_url,
            barcode,
            prices,
        }
    }
}

/// Runs `read`, substituting [`CardFields::placeholder`] if it panics so one
/// card cannot cost the rest of its page.
fn guard_card(read: impl FnOnce() -> CardFields) -> CardFields {
    catch_panic(read).unwrap_or_else(|reason| {
        tracing::warn!(%reason, "card extraction panicked; writing placeholders");
        CardFields::placeholder()
    })
}

/// All text below `element` on one line: every whitespace run, including
/// newlines and indentation between child elements, becomes a single space.
fn normalized_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `src`, or `data-src` when `src` is missing or blank (lazy-loaded images).
fn image_source(img: &ElementRef<'_>) -> Option<String> {
    non_blank_attr(img, "src")
        .or_else(|| non_blank_attr(img, "data-src"))
        .map(str::to_owned)
}

fn non_blank_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Returns the first 8–14 digit run in `image_url`, verbatim.
#[must_use]
pub fn find_barcode(image_url: &str) -> Option<&str> {
    BARCODE_RE.find(image_url).map(|m| m.as_str())
}

/// Returns the digit/comma tokens of a price text, left to right.
#[must_use]
pub fn price_tokens(text: &str) -> Vec<&str> {
    PRICE_TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
