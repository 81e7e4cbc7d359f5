//! Locating product cards and their parts in a parsed page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::class_match::ClassPrefix;

/// Every element that carries a `class` attribute, in document order.
static CLASSED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class]").expect("valid class selector"));

fn has_prefix(element: &ElementRef<'_>, prefix: &ClassPrefix) -> bool {
    prefix.matches(element.value().classes())
}

/// Returns all card elements in `document`, in document order.
///
/// Any element qualifies, whatever its tag. Repeated cards are returned
/// repeatedly; nested matches are returned as separate cards.
#[must_use]
pub fn discover_cards<'a>(document: &'a Html, card_prefix: &ClassPrefix) -> Vec<ElementRef<'a>> {
    document
        .select(&CLASSED)
        .filter(|element| has_prefix(element, card_prefix))
        .collect()
}

/// Returns the first descendant of `scope` (excluding `scope` itself) whose
/// class list matches `prefix`.
#[must_use]
pub fn first_with_prefix<'a>(scope: ElementRef<'a>, prefix: &ClassPrefix) -> Option<ElementRef<'a>> {
    scope
        .select(&CLASSED)
        .find(|element| has_prefix(element, prefix))
}
