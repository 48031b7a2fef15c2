//! Fault-tolerant accumulation of items for one page.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{InfoItem, ItemSource};
use crate::error::ExtractionError;
use crate::service::ServiceId;

type ItemFilter = Box<dyn Fn(&InfoItem) -> bool + Send + Sync>;

/// Why a committed source produced no item and no error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source flagged itself as an ad or promoted placeholder.
    Advertisement,
    /// An item with the same URL was already collected.
    Duplicate,
    /// The collector's filter rejected the item.
    Filtered,
}

/// Result of one [`InfoItemsCollector::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The item was appended.
    Added,
    /// Nothing was appended; not an error.
    Skipped(SkipReason),
    /// A getter failed with a recoverable error, which was recorded.
    Recorded,
}

/// A per-item failure that did not abort the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Zero-based position of the source among everything committed.
    pub position: usize,
    /// The failure.
    pub error: ExtractionError,
}

/// Turns per-item extractors into [`InfoItem`]s for one page.
///
/// Items keep the order sources were committed in. A source whose getters fail
/// with a recoverable error is recorded in [`errors`](Self::errors) and the
/// collector moves on; any other failure is returned to the caller.
pub struct InfoItemsCollector {
    service_id: ServiceId,
    items: Vec<InfoItem>,
    errors: Vec<ItemError>,
    seen_urls: Option<HashSet<String>>,
    filter: Option<ItemFilter>,
    position: usize,
}

impl InfoItemsCollector {
    /// Creates an empty collector for `service_id`.
    #[must_use]
    pub fn new(service_id: ServiceId) -> Self {
        Self {
            service_id,
            items: Vec::new(),
            errors: Vec::new(),
            seen_urls: None,
            filter: None,
            position: 0,
        }
    }

    /// Drops items whose URL was already collected.
    #[must_use]
    pub fn deduplicated(mut self) -> Self {
        self.seen_urls = Some(HashSet::new());
        self
    }

    /// Keeps only items for which `filter` returns true.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&InfoItem) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Extracts one item from `source` and appends it.
    ///
    /// # Errors
    ///
    /// Returns any non-recoverable error raised by the source's getters (for
    /// example a structural failure), leaving the collected items untouched.
    pub fn commit(&mut self, source: ItemSource<'_>) -> Result<CommitOutcome, ExtractionError> {
        let position = self.position;
        self.position += 1;

        if source.is_ad() {
            debug!(position, "Skipping advertisement");
            return Ok(CommitOutcome::Skipped(SkipReason::Advertisement));
        }

        let item = match source.build(self.service_id) {
            Ok(item) => item,
            Err(error) if error.is_recoverable() => {
                warn!(position, error = %error, "Item extraction failed; recording and continuing");
                self.errors.push(ItemError { position, error });
                return Ok(CommitOutcome::Recorded);
            }
            Err(error) => return Err(error),
        };

        if let Some(filter) = &self.filter
            && !filter(&item)
        {
            return Ok(CommitOutcome::Skipped(SkipReason::Filtered));
        }

        if let Some(seen) = &mut self.seen_urls
            && !seen.insert(item.url().to_string())
        {
            debug!(position, url = item.url(), "Skipping duplicate item");
            return Ok(CommitOutcome::Skipped(SkipReason::Duplicate));
        }

        self.items.push(item);
        Ok(CommitOutcome::Added)
    }

    /// Items collected so far, in commit order.
    #[must_use]
    pub fn items(&self) -> &[InfoItem] {
        &self.items
    }

    /// Recoverable failures recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ItemError] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the collector into `(items, errors)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<InfoItem>, Vec<ItemError>) {
        (self.items, self.errors)
    }
}

impl std::fmt::Debug for InfoItemsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoItemsCollector")
            .field("service_id", &self.service_id)
            .field("items", &self.items.len())
            .field("errors", &self.errors.len())
            .field("deduplicated", &self.seen_urls.is_some())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}
