//! Pages of items and the continuation tokens that link them.

use serde::Serialize;

use crate::info_item::{InfoItem, InfoItemsCollector, ItemError};

/// Opaque, service-issued handle for the next page of a listing.
///
/// Never empty: an empty string and an absent value both mean "no more pages"
/// and are represented as `None` by [`ContinuationToken::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Wraps a raw token; returns `None` for an empty string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    /// Normalizes an optional raw token; `None` and `Some("")` are both absent.
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::new)
    }

    /// The raw token, exactly as the service issued it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct InfoItemsPage {
    items: Vec<InfoItem>,
    next_page: Option<ContinuationToken>,
    errors: Vec<ItemError>,
}

impl InfoItemsPage {
    /// Finishes a collector into a page.
    #[must_use]
    pub fn new(collector: InfoItemsCollector, next_page: Option<ContinuationToken>) -> Self {
        let (items, errors) = collector.into_parts();
        Self {
            items,
            next_page,
            errors,
        }
    }

    /// A terminal page with no items and no continuation.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Items in source order.
    #[must_use]
    pub fn items(&self) -> &[InfoItem] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<InfoItem> {
        self.items
    }

    /// The token for the following page, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<&ContinuationToken> {
        self.next_page.as_ref()
    }

    /// Returns true if another page can be requested.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Non-fatal per-item failures recorded while building this page.
    #[must_use]
    pub fn errors(&self) -> &[ItemError] {
        &self.errors
    }
}
