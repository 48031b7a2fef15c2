//! The events tab of a conference.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::conference::{Conference, fetch_conference};
use super::items::EventItem;
use crate::channel::{ChannelTab, ChannelTabExtractor, TabContent};
use crate::error::ExtractionError;
use crate::extractor::{
    ContinuationToken, Extractor, ExtractorContext, InfoItemsPage, ListExtractor, PageState,
};
use crate::info_item::{InfoItemsCollector, ItemSource};
use crate::link_handler::LinkHandler;
use crate::service::ServiceId;

/// All talks of a conference, listed in one page.
///
/// The API returns every event with the conference, so the listing never
/// has a continuation.
pub struct MediaCccEventsExtractor {
    handler: LinkHandler,
    ctx: ExtractorContext,
    api_base: String,
    state: PageState<Arc<Conference>>,
}

impl MediaCccEventsExtractor {
    /// Creates an unfetched tab that loads the conference itself.
    pub(crate) fn new(handler: LinkHandler, ctx: &ExtractorContext, api_base: &str) -> Self {
        Self {
            handler,
            ctx: ctx.clone(),
            api_base: api_base.to_string(),
            state: PageState::new(),
        }
    }

    /// Creates a tab over an already fetched conference.
    pub(crate) fn from_conference(
        handler: LinkHandler,
        ctx: &ExtractorContext,
        api_base: &str,
        conference: Arc<Conference>,
    ) -> Self {
        Self {
            handler,
            ctx: ctx.clone(),
            api_base: api_base.to_string(),
            state: PageState::prefetched(conference),
        }
    }
}

impl std::fmt::Debug for MediaCccEventsExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCccEventsExtractor")
            .field("id", &self.handler.id())
            .field("fetched", &self.state.is_fetched())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for MediaCccEventsExtractor {
    fn service_id(&self) -> ServiceId {
        ServiceId::MEDIA_CCC
    }

    fn link_handler(&self) -> &LinkHandler {
        &self.handler
    }

    fn is_fetched(&self) -> bool {
        self.state.is_fetched()
    }

    #[tracing::instrument(skip(self), fields(service = "media.ccc.de", tab = "events"))]
    async fn fetch_page(&mut self) -> Result<(), ExtractionError> {
        let ctx = &self.ctx;
        let api_base = self.api_base.as_str();
        let acronym = self.handler.id();
        self.state
            .fetch_once(|| async move {
                fetch_conference(ctx, api_base, acronym).await.map(Arc::new)
            })
            .await
    }

    fn name(&self) -> Result<String, ExtractionError> {
        self.state.get()?;
        Ok(ChannelTab::Events.as_str().to_string())
    }
}

#[async_trait]
impl ListExtractor for MediaCccEventsExtractor {
    fn initial_page(&self) -> Result<InfoItemsPage, ExtractionError> {
        let conference = self.state.get()?;
        let events = match conference.events() {
            TabContent::Listed(events) => events,
            TabContent::Empty => {
                debug!("Conference has no events");
                return Ok(InfoItemsPage::empty());
            }
            TabContent::Absent => {
                return Err(ExtractionError::content_not_available(
                    self.handler.url(),
                    "conference response has no events listing",
                ));
            }
        };

        let mut collector = InfoItemsCollector::new(ServiceId::MEDIA_CCC).deduplicated();
        for event in events {
            collector.commit(ItemSource::Stream(&EventItem::new(event, conference)))?;
        }
        Ok(InfoItemsPage::new(collector, None))
    }

    async fn fetch_continuation(
        &self,
        _token: &ContinuationToken,
    ) -> Result<InfoItemsPage, ExtractionError> {
        Err(ExtractionError::illegal_argument(
            "media.ccc.de event listings have a single page",
        ))
    }
}

impl ChannelTabExtractor for MediaCccEventsExtractor {
    fn tab(&self) -> ChannelTab {
        ChannelTab::Events
    }
}
