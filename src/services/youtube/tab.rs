//! Paginated channel tabs (videos, playlists).

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::items::{GridContext, Uploader, collect_grid_items};
use super::parsing::{
    CountFormat, channel_title, check_alerts, continuation_from, fetch_browse_response,
    find_tab, grid_renderer, localized_query,
};
use crate::channel::{ChannelTab, ChannelTabExtractor, TabContent};
use crate::error::ExtractionError;
use crate::extractor::{
    ContinuationToken, Extractor, ExtractorContext, InfoItemsPage, ListExtractor, PageState,
};
use crate::info_item::InfoItemsCollector;
use crate::link_handler::LinkHandler;
use crate::service::ServiceId;

/// One grid tab of a YouTube channel.
///
/// Continuation tokens are `browse_ajax` URLs on the extractor's base URL.
pub struct YoutubeTabExtractor {
    handler: LinkHandler,
    tab: ChannelTab,
    ctx: ExtractorContext,
    base_url: String,
    state: PageState<Arc<Value>>,
    /// Channel title used for uploader fields. Set from the fetched response
    /// when it carries channel metadata, otherwise backfilled by the first
    /// continuation page that does. Never overwritten once set.
    channel_name: OnceLock<String>,
}

impl YoutubeTabExtractor {
    /// Creates an unfetched tab that loads its own page.
    pub(crate) fn new(
        handler: LinkHandler,
        tab: ChannelTab,
        ctx: &ExtractorContext,
        base_url: &str,
    ) -> Self {
        Self {
            handler,
            tab,
            ctx: ctx.clone(),
            base_url: base_url.to_string(),
            state: PageState::new(),
            channel_name: OnceLock::new(),
        }
    }

    /// Creates a tab over a channel response that already holds its content.
    pub(crate) fn from_channel_response(
        handler: LinkHandler,
        tab: ChannelTab,
        ctx: &ExtractorContext,
        base_url: &str,
        response: Arc<Value>,
    ) -> Self {
        let channel_name = OnceLock::new();
        if let Some(title) = channel_title(&response) {
            channel_name.get_or_init(|| title.to_string());
        }
        Self {
            handler,
            tab,
            ctx: ctx.clone(),
            base_url: base_url.to_string(),
            state: PageState::prefetched(response),
            channel_name,
        }
    }

    fn tab_url(&self) -> String {
        format!(
            "{}/channel/{}/{}?pbj=1&view=1&flow=grid{}",
            self.base_url,
            self.handler.id(),
            self.tab,
            localized_query(&self.ctx)
        )
    }

    fn grid(&self) -> GridContext<'_> {
        GridContext {
            uploader: Uploader {
                name: self.channel_name.get().map(String::as_str),
                url: self.handler.url(),
            },
            counts: CountFormat::of(&self.ctx.localization),
        }
    }

    /// The channel title, once known.
    #[must_use]
    pub fn channel_name(&self) -> Option<&str> {
        self.channel_name.get().map(String::as_str)
    }
}

impl std::fmt::Debug for YoutubeTabExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeTabExtractor")
            .field("id", &self.handler.id())
            .field("tab", &self.tab)
            .field("fetched", &self.state.is_fetched())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for YoutubeTabExtractor {
    fn service_id(&self) -> ServiceId {
        ServiceId::YOUTUBE
    }

    fn link_handler(&self) -> &LinkHandler {
        &self.handler
    }

    fn is_fetched(&self) -> bool {
        self.state.is_fetched()
    }

    #[tracing::instrument(skip(self), fields(service = "youtube", tab = %self.tab))]
    async fn fetch_page(&mut self) -> Result<(), ExtractionError> {
        let url = self.tab_url();
        let ctx = &self.ctx;
        let channel_name = &self.channel_name;
        self.state
            .fetch_once(|| async move {
                let response = fetch_browse_response(ctx, &url).await?;
                check_alerts(&response, &url)?;
                if let Some(title) = channel_title(&response) {
                    channel_name.get_or_init(|| title.to_string());
                }
                info!(url = %url, "Fetched channel tab");
                Ok(Arc::new(response))
            })
            .await
    }

    fn name(&self) -> Result<String, ExtractionError> {
        self.state.get()?;
        Ok(self.tab.as_str().to_string())
    }
}

#[async_trait]
impl ListExtractor for YoutubeTabExtractor {
    fn initial_page(&self) -> Result<InfoItemsPage, ExtractionError> {
        let response = self.state.get()?;
        let renderer = match find_tab(response, self.tab) {
            TabContent::Listed(renderer) => renderer,
            TabContent::Empty => {
                debug!(tab = %self.tab, "Service reports the tab as empty");
                return Ok(InfoItemsPage::empty());
            }
            TabContent::Absent => {
                return Err(ExtractionError::content_not_available(
                    self.handler.url(),
                    &format!("channel has no {} tab", self.tab),
                ));
            }
        };

        let grid = grid_renderer(renderer).ok_or_else(|| {
            ExtractionError::malformed_response(self.handler.url(), "tab content has no grid listing")
        })?;
        let items = grid
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut collector = InfoItemsCollector::new(ServiceId::YOUTUBE);
        collect_grid_items(&mut collector, items, self.grid())?;
        let next = continuation_from(&self.base_url, grid.get("continuations"));
        Ok(InfoItemsPage::new(collector, next))
    }

    #[tracing::instrument(skip(self, token), fields(service = "youtube", tab = %self.tab))]
    async fn fetch_continuation(
        &self,
        token: &ContinuationToken,
    ) -> Result<InfoItemsPage, ExtractionError> {
        let url = token.as_str();
        if !url.starts_with(&format!("{}/browse_ajax?", self.base_url)) {
            return Err(ExtractionError::illegal_argument(
                "continuation token was not issued by a YouTube channel tab",
            ));
        }

        let response = fetch_browse_response(&self.ctx, url).await?;
        check_alerts(&response, url)?;

        let Some(contents) = response.get("continuationContents") else {
            debug!("Continuation has no contents; listing exhausted");
            return Ok(InfoItemsPage::empty());
        };
        if let Some(title) = channel_title(&response) {
            self.channel_name.get_or_init(|| title.to_string());
        }
        let Some(grid) = contents.get("gridContinuation") else {
            return Ok(InfoItemsPage::empty());
        };
        let Some(items) = grid.get("items").and_then(Value::as_array) else {
            return Ok(InfoItemsPage::empty());
        };

        let mut collector = InfoItemsCollector::new(ServiceId::YOUTUBE);
        collect_grid_items(&mut collector, items, self.grid())?;
        let next = continuation_from(&self.base_url, grid.get("continuations"));
        debug!(items = collector.len(), has_next = next.is_some(), "Parsed continuation page");
        Ok(InfoItemsPage::new(collector, next))
    }
}

impl ChannelTabExtractor for YoutubeTabExtractor {
    fn tab(&self) -> ChannelTab {
        self.tab
    }
}
