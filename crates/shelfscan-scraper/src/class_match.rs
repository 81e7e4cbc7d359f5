//! Class-name prefix matching.
//!
//! Storefront builds append hash suffixes to CSS-module class names
//! (`productCard_title__x9Y8z`), so elements are selected by class *prefix*
//! rather than by exact class. The matcher works on plain class tokens and
//! knows nothing about the HTML parser.

/// A class-name prefix such as `productCard_price_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPrefix(String);

impl ClassPrefix {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Returns `true` if any token in `classes` starts with this prefix.
    pub fn matches<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> bool {
        classes
            .into_iter()
            .any(|class| class.starts_with(self.0.as_str()))
    }

    /// Same as [`Self::matches`] for a raw `class` attribute value.
    #[must_use]
    pub fn matches_attr(&self, class_attr: &str) -> bool {
        self.matches(class_attr.split_ascii_whitespace())
    }
}

impl std::fmt::Display for ClassPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
