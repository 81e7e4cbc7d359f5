use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Placeholder written to `name` and the price fields when the card markup
/// does not carry them.
pub const NOT_AVAILABLE: &str = "N/A";

/// One exported row: a single product card scraped from a category page.
///
/// Missing sub-fields are already replaced by sentinels here. `name` and the
/// price fields fall back to [`NOT_AVAILABLE`], `image_url` and `barcode` fall
/// back to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Start time of the run that produced this record. Identical for every
    /// record of one run.
    pub scraped_at: DateTime<Local>,
    pub name: String,
    pub image_url: String,
    /// 8–14 digit run lifted verbatim from `image_url`, e.g. `"8850123456789"`.
    pub barcode: String,
    /// Regular shelf price as printed on the card, e.g. `"1,299"`.
    pub normal_price: String,
    /// Promotion price as printed on the card. Equal to `normal_price` when
    /// the card shows a single price.
    pub promotion_price: String,
}

impl ProductRecord {
    /// Returns `true` when the card showed two distinct prices.
    #[must_use]
    pub fn is_on_promotion(&self) -> bool {
        self.promotion_price != NOT_AVAILABLE && self.promotion_price != self.normal_price
    }

    /// Returns `true` when the barcode could be derived from the image URL.
    #[must_use]
    pub fn has_barcode(&self) -> bool {
        !self.barcode.is_empty()
    }
}
