//! media.ccc.de: conferences as channels, with their talks as an events tab.

mod conference;
mod events;
mod items;
mod link_handler;

pub use conference::MediaCccConferenceExtractor;
pub use events::MediaCccEventsExtractor;
pub use link_handler::MediaCccConferenceLinkHandlerFactory;

use crate::channel::{ChannelExtractor, ChannelTab, ChannelTabExtractor};
use crate::error::ExtractionError;
use crate::extractor::ExtractorContext;
use crate::link_handler::{LinkHandler, LinkHandlerFactory};
use crate::service::{ServiceId, StreamingService};

/// Default public API origin.
const DEFAULT_API_BASE: &str = "https://api.media.ccc.de";

pub struct MediaCccService {
    conference_links: MediaCccConferenceLinkHandlerFactory,
    api_base: String,
}

impl MediaCccService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Creates a service that calls a custom API origin (for testing with wiremock).
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            conference_links: MediaCccConferenceLinkHandlerFactory,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for MediaCccService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MediaCccService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCccService")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl StreamingService for MediaCccService {
    fn service_id(&self) -> ServiceId {
        ServiceId::MEDIA_CCC
    }

    fn name(&self) -> &str {
        "media.ccc.de"
    }

    fn link_handler_factories(&self) -> Vec<&dyn LinkHandlerFactory> {
        vec![&self.conference_links]
    }

    fn channel_extractor(
        &self,
        handler: LinkHandler,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelExtractor>, ExtractionError> {
        Ok(Box::new(MediaCccConferenceExtractor::new(
            handler,
            ctx,
            &self.api_base,
        )))
    }

    fn channel_tab_extractor(
        &self,
        handler: LinkHandler,
        tab: ChannelTab,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelTabExtractor>, ExtractionError> {
        if tab != ChannelTab::Events {
            return Err(ExtractionError::not_supported(&format!(
                "{}/{tab}",
                handler.url()
            )));
        }
        Ok(Box::new(MediaCccEventsExtractor::new(
            handler,
            ctx,
            &self.api_base,
        )))
    }
}
