//! Extractor lifecycle and the paginated list protocol.
//!
//! # Architecture
//!
//! - [`Extractor`] - Base contract: one [`LinkHandler`], fetched exactly once
//! - [`ListExtractor`] - An extractor whose content is a paginated listing
//! - [`PageState`] - The fetch-once cell every extractor keeps its page in
//! - [`InfoItemsPage`] / [`ContinuationToken`] - One page and the link to the next
//! - [`ExtractorContext`] - Transport and localization handed to every extractor
//!
//! Getters that only need the link handler (`id`, `url`, `original_url`) work
//! at any time. Getters that read page content fail with
//! [`ExtractionError::IllegalArgument`] before [`Extractor::fetch_page`] and
//! with the memoized fetch error after a failed fetch.

mod page;
mod state;

pub use page::{ContinuationToken, InfoItemsPage};
pub use state::PageState;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ExtractionError;
use crate::link_handler::LinkHandler;
use crate::localization::Localization;
use crate::service::ServiceId;
use crate::transport::Transport;

/// Collaborators an extractor needs to fetch pages.
#[derive(Clone)]
pub struct ExtractorContext {
    /// Transport every request goes through.
    pub transport: Arc<dyn Transport>,
    /// Localization requested from the service.
    pub localization: Localization,
}

impl ExtractorContext {
    /// Creates a context with the default localization.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            localization: Localization::default(),
        }
    }

    /// Replaces the localization.
    #[must_use]
    pub fn with_localization(mut self, localization: Localization) -> Self {
        self.localization = localization;
        self
    }
}

impl std::fmt::Debug for ExtractorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorContext")
            .field("localization", &self.localization)
            .finish_non_exhaustive()
    }
}

/// Base contract shared by every extractor role.
///
/// # Object Safety
///
/// This trait uses `async_trait` so extractors can be handed out as
/// `Box<dyn ...>` by service factories.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// The service this extractor belongs to.
    fn service_id(&self) -> ServiceId;

    /// The link this extractor was created for.
    fn link_handler(&self) -> &LinkHandler;

    /// Returns true once [`fetch_page`](Self::fetch_page) has succeeded.
    fn is_fetched(&self) -> bool;

    /// Fetches the page state. Only the first call touches the transport;
    /// later calls return the memoized outcome.
    ///
    /// # Errors
    ///
    /// Returns the transport, parsing or availability error that stopped the
    /// fetch, verbatim on every call.
    async fn fetch_page(&mut self) -> Result<(), ExtractionError>;

    /// Display name of the extracted entity.
    ///
    /// # Errors
    ///
    /// Fails before fetch, after a failed fetch, or when the name is missing.
    fn name(&self) -> Result<String, ExtractionError>;

    /// Canonical id; available before fetch.
    fn id(&self) -> &str {
        self.link_handler().id()
    }

    /// Canonical URL; available before fetch.
    fn url(&self) -> &str {
        self.link_handler().url()
    }

    /// The URL the extractor was created from.
    ///
    /// # Errors
    ///
    /// The default never fails; services that refine it from page content
    /// may surface parsing errors.
    fn original_url(&self) -> Result<String, ExtractionError> {
        Ok(self.link_handler().original_url().to_string())
    }
}

/// An extractor whose content is a paginated listing.
#[async_trait]
pub trait ListExtractor: Extractor {
    /// First page, derived from the state loaded by `fetch_page` without
    /// further requests.
    ///
    /// # Errors
    ///
    /// Fails before fetch, after a failed fetch, or when the listing structure
    /// is unusable. A service-reported empty listing is an empty page, not an error.
    fn initial_page(&self) -> Result<InfoItemsPage, ExtractionError>;

    /// Fetches the page behind a non-empty token. Called by
    /// [`get_page`](Self::get_page) after the token is validated; each call is
    /// a fresh request and parse.
    ///
    /// # Errors
    ///
    /// Returns the transport or page-level parsing error for this page.
    async fn fetch_continuation(
        &self,
        token: &ContinuationToken,
    ) -> Result<InfoItemsPage, ExtractionError>;

    /// Fetches the page behind `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::IllegalArgument`] for an empty token without
    /// issuing any request, otherwise the errors of
    /// [`fetch_continuation`](Self::fetch_continuation).
    async fn get_page(&self, token: &str) -> Result<InfoItemsPage, ExtractionError> {
        let Some(token) = ContinuationToken::new(token) else {
            return Err(ExtractionError::empty_token());
        };
        debug!(
            service_id = %self.service_id(),
            id = self.id(),
            "Fetching continuation page"
        );
        self.fetch_continuation(&token).await
    }
}
