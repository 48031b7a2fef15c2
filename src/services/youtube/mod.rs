//! YouTube: channels with grid-paginated videos and playlists tabs.
//!
//! Pages are read from the `pbj=1` browse endpoints, which return the same
//! JSON the web client renders from. Continuations are `browse_ajax` URLs.

mod channel;
mod items;
mod link_handler;
mod parsing;
mod tab;

pub use channel::YoutubeChannelExtractor;
pub use link_handler::YoutubeChannelLinkHandlerFactory;
pub use tab::YoutubeTabExtractor;

use crate::channel::{ChannelExtractor, ChannelTab, ChannelTabExtractor};
use crate::error::ExtractionError;
use crate::extractor::ExtractorContext;
use crate::link_handler::{LinkHandler, LinkHandlerFactory};
use crate::service::{ServiceId, StreamingService};

/// Default web origin.
const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

pub struct YoutubeService {
    channel_links: YoutubeChannelLinkHandlerFactory,
    base_url: String,
}

impl YoutubeService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a service that fetches from a custom origin (for testing with wiremock).
    ///
    /// Link handling is unaffected: canonical URLs stay on `www.youtube.com`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            channel_links: YoutubeChannelLinkHandlerFactory,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for YoutubeService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for YoutubeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeService")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StreamingService for YoutubeService {
    fn service_id(&self) -> ServiceId {
        ServiceId::YOUTUBE
    }

    fn name(&self) -> &str {
        "YouTube"
    }

    fn link_handler_factories(&self) -> Vec<&dyn LinkHandlerFactory> {
        vec![&self.channel_links]
    }

    fn channel_extractor(
        &self,
        handler: LinkHandler,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelExtractor>, ExtractionError> {
        Ok(Box::new(YoutubeChannelExtractor::new(
            handler,
            ctx,
            &self.base_url,
        )))
    }

    fn channel_tab_extractor(
        &self,
        handler: LinkHandler,
        tab: ChannelTab,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelTabExtractor>, ExtractionError> {
        if !channel::LISTED_TABS.contains(&tab) {
            return Err(ExtractionError::not_supported(&format!(
                "{}/{tab}",
                handler.url()
            )));
        }
        Ok(Box::new(YoutubeTabExtractor::new(
            handler,
            tab,
            ctx,
            &self.base_url,
        )))
    }
}
