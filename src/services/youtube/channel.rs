//! YouTube channel metadata and tab discovery.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::parsing::{
    CountFormat, channel_title, check_alerts, fetch_browse_response, find_tab, first_thumbnail,
    has_content, last_thumbnail, localized_query, str_at, text_of,
};
use super::tab::YoutubeTabExtractor;
use crate::channel::{ChannelExtractor, ChannelTab, ChannelTabExtractor, TabContent};
use crate::error::ExtractionError;
use crate::extractor::{Extractor, ExtractorContext, PageState};
use crate::link_handler::LinkHandler;
use crate::service::ServiceId;

/// Tabs this extractor knows how to list.
pub(crate) const LISTED_TABS: [ChannelTab; 2] = [ChannelTab::Videos, ChannelTab::Playlists];

pub struct YoutubeChannelExtractor {
    handler: LinkHandler,
    ctx: ExtractorContext,
    base_url: String,
    state: PageState<Arc<Value>>,
}

impl YoutubeChannelExtractor {
    pub(crate) fn new(handler: LinkHandler, ctx: &ExtractorContext, base_url: &str) -> Self {
        Self {
            handler,
            ctx: ctx.clone(),
            base_url: base_url.to_string(),
            state: PageState::new(),
        }
    }

    fn channel_page_url(&self) -> String {
        format!(
            "{}/channel/{}/videos?pbj=1&view=0&flow=grid{}",
            self.base_url,
            self.handler.id(),
            localized_query(&self.ctx)
        )
    }
}

impl std::fmt::Debug for YoutubeChannelExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeChannelExtractor")
            .field("id", &self.handler.id())
            .field("base_url", &self.base_url)
            .field("fetched", &self.state.is_fetched())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for YoutubeChannelExtractor {
    fn service_id(&self) -> ServiceId {
        ServiceId::YOUTUBE
    }

    fn link_handler(&self) -> &LinkHandler {
        &self.handler
    }

    fn is_fetched(&self) -> bool {
        self.state.is_fetched()
    }

    #[tracing::instrument(skip(self), fields(service = "youtube"))]
    async fn fetch_page(&mut self) -> Result<(), ExtractionError> {
        let url = self.channel_page_url();
        let ctx = &self.ctx;
        self.state
            .fetch_once(|| async move {
                let response = fetch_browse_response(ctx, &url).await?;
                check_alerts(&response, &url)?;
                info!(url = %url, "Fetched channel page");
                Ok(Arc::new(response))
            })
            .await
    }

    fn name(&self) -> Result<String, ExtractionError> {
        channel_title(self.state.get()?)
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::missing_field("metadata.channelMetadataRenderer.title"))
    }
}

impl ChannelExtractor for YoutubeChannelExtractor {
    fn avatar_url(&self) -> Result<Option<String>, ExtractionError> {
        let response = self.state.get()?;
        Ok(first_thumbnail(response, "/metadata/channelMetadataRenderer/avatar")
            .or_else(|| first_thumbnail(response, "/header/c4TabbedHeaderRenderer/avatar")))
    }

    fn banner_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(last_thumbnail(
            self.state.get()?,
            "/header/c4TabbedHeaderRenderer/banner",
        ))
    }

    fn feed_url(&self) -> Result<Option<String>, ExtractionError> {
        self.state.get()?;
        Ok(Some(format!(
            "https://www.youtube.com/feeds/videos.xml?channel_id={}",
            self.handler.id()
        )))
    }

    fn subscriber_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(self
            .state
            .get()?
            .pointer("/header/c4TabbedHeaderRenderer/subscriberCountText")
            .and_then(text_of)
            .and_then(|text| CountFormat::of(&self.ctx.localization).parse(&text)))
    }

    fn description(&self) -> Result<Option<String>, ExtractionError> {
        Ok(
            str_at(self.state.get()?, "/metadata/channelMetadataRenderer/description")
                .filter(|description| !description.is_empty())
                .map(str::to_string),
        )
    }

    fn tabs(&self) -> Result<Vec<Box<dyn ChannelTabExtractor>>, ExtractionError> {
        let response = self.state.get()?;
        let mut tabs: Vec<Box<dyn ChannelTabExtractor>> = Vec::new();

        for tab in LISTED_TABS {
            let extractor = match find_tab(response, tab) {
                TabContent::Absent => {
                    debug!(tab = %tab, "Tab absent from channel response; omitting");
                    continue;
                }
                // Only the selected tab ships its content; the others load on fetch.
                TabContent::Listed(renderer) if !has_content(renderer) => {
                    YoutubeTabExtractor::new(self.handler.clone(), tab, &self.ctx, &self.base_url)
                }
                TabContent::Listed(_) | TabContent::Empty => YoutubeTabExtractor::from_channel_response(
                    self.handler.clone(),
                    tab,
                    &self.ctx,
                    &self.base_url,
                    Arc::clone(response),
                ),
            };
            tabs.push(Box::new(extractor));
        }
        Ok(tabs)
    }
}
