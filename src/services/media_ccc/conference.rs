//! Conferences, extracted as channels.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::events::MediaCccEventsExtractor;
use super::link_handler::MediaCccConferenceLinkHandlerFactory;
use crate::channel::{ChannelExtractor, ChannelTabExtractor, TabContent};
use crate::error::ExtractionError;
use crate::extractor::{Extractor, ExtractorContext, PageState};
use crate::link_handler::LinkHandler;
use crate::service::ServiceId;

// ==================== API Response Types ====================

/// `GET /public/conferences/{acronym}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Conference {
    pub acronym: Option<String>,
    pub title: Option<String>,
    pub logo_url: Option<String>,
    /// Kept raw so one malformed event cannot fail the whole conference.
    pub events: Option<Vec<Value>>,
}

impl Conference {
    /// Events listing: `[]` is empty, a missing key is absent.
    pub(crate) fn events(&self) -> TabContent<&[Value]> {
        match self.events.as_deref() {
            None => TabContent::Absent,
            Some([]) => TabContent::Empty,
            Some(events) => TabContent::Listed(events),
        }
    }

    /// Frontend page of the conference, when the acronym is known.
    pub(crate) fn page_url(&self) -> Option<String> {
        self.acronym
            .as_deref()
            .map(MediaCccConferenceLinkHandlerFactory::conference_url)
    }
}

/// Fetches and decodes one conference.
pub(crate) async fn fetch_conference(
    ctx: &ExtractorContext,
    api_base: &str,
    acronym: &str,
) -> Result<Conference, ExtractionError> {
    let url = format!(
        "{api_base}/public/conferences/{}",
        urlencoding::encode(acronym)
    );
    debug!(api_url = %url, "Calling media.ccc.de API");

    let response = ctx.transport.get(&url, &[]).await?.ensure_success()?;
    let conference: Conference = serde_json::from_value(response.json()?).map_err(|error| {
        ExtractionError::malformed_response(
            &response.url,
            &format!("unexpected conference format: {error}"),
        )
    })?;
    info!(url = %url, "Fetched conference");
    Ok(conference)
}

// ==================== MediaCccConferenceExtractor ====================

pub struct MediaCccConferenceExtractor {
    handler: LinkHandler,
    ctx: ExtractorContext,
    api_base: String,
    state: PageState<Arc<Conference>>,
}

impl MediaCccConferenceExtractor {
    pub(crate) fn new(handler: LinkHandler, ctx: &ExtractorContext, api_base: &str) -> Self {
        Self {
            handler,
            ctx: ctx.clone(),
            api_base: api_base.to_string(),
            state: PageState::new(),
        }
    }
}

impl std::fmt::Debug for MediaCccConferenceExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCccConferenceExtractor")
            .field("id", &self.handler.id())
            .field("api_base", &self.api_base)
            .field("fetched", &self.state.is_fetched())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for MediaCccConferenceExtractor {
    fn service_id(&self) -> ServiceId {
        ServiceId::MEDIA_CCC
    }

    fn link_handler(&self) -> &LinkHandler {
        &self.handler
    }

    fn is_fetched(&self) -> bool {
        self.state.is_fetched()
    }

    #[tracing::instrument(skip(self), fields(service = "media.ccc.de"))]
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
        self.state
            .get()?
            .title
            .clone()
            .ok_or_else(|| ExtractionError::missing_field("title"))
    }

    /// The conference page, once the response confirms the acronym;
    /// the URL the extractor was created from until then.
    fn original_url(&self) -> Result<String, ExtractionError> {
        match self.state.get() {
            Ok(conference) => conference
                .page_url()
                .ok_or_else(|| ExtractionError::missing_field("acronym")),
            Err(_) => Ok(self.handler.original_url().to_string()),
        }
    }
}

impl ChannelExtractor for MediaCccConferenceExtractor {
    fn avatar_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.state.get()?.logo_url.clone())
    }

    fn banner_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.state.get()?.logo_url.clone())
    }

    fn tabs(&self) -> Result<Vec<Box<dyn ChannelTabExtractor>>, ExtractionError> {
        let conference = self.state.get()?;
        if !conference.events().is_present() {
            debug!("Conference response has no events listing; omitting tab");
            return Ok(Vec::new());
        }
        Ok(vec![Box::new(MediaCccEventsExtractor::from_conference(
            self.handler.clone(),
            &self.ctx,
            &self.api_base,
            Arc::clone(conference),
        ))])
    }
}
