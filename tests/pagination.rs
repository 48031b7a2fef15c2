//! Integration tests for the paginated list protocol.
//!
//! Uses a minimal service-agnostic list extractor, built only from the public
//! capability traits, over a scripted transport.

use std::sync::Arc;

use async_trait::async_trait;
use pipe_extractor::info_item::{InfoItemExtractor, StreamInfoItemExtractor};
use pipe_extractor::{
    ContinuationToken, ExtractionError, Extractor, ExtractorContext, InfoItemsCollector,
    InfoItemsPage, ItemSource, LinkHandler, ListExtractor, PageState, ServiceId,
};
use serde_json::{Value, json};

mod support;
use support::stub_transport::ScriptedTransport;

const FIRST_PAGE: &str = "https://stub.test/list?page=1";

/// Lists `{"items": [{"name", "url"}], "next": url | ""}` pages.
struct StubListExtractor {
    handler: LinkHandler,
    ctx: ExtractorContext,
    state: PageState<Value>,
}

impl StubListExtractor {
    fn new(ctx: ExtractorContext) -> Self {
        Self {
            handler: LinkHandler::new(FIRST_PAGE, FIRST_PAGE, "list"),
            ctx,
            state: PageState::new(),
        }
    }

    async fn load(ctx: &ExtractorContext, url: &str) -> Result<Value, ExtractionError> {
        ctx.transport.get(url, &[]).await?.ensure_success()?.json()
    }

    fn page_from(json: &Value) -> Result<InfoItemsPage, ExtractionError> {
        let mut collector = InfoItemsCollector::new(ServiceId::new(99));
        for raw in json["items"].as_array().into_iter().flatten() {
            collector.commit(ItemSource::Stream(&StubItem(raw)))?;
        }
        let next = ContinuationToken::from_optional(json["next"].as_str());
        Ok(InfoItemsPage::new(collector, next))
    }
}

struct StubItem<'a>(&'a Value);

impl InfoItemExtractor for StubItem<'_> {
    fn name(&self) -> Result<String, ExtractionError> {
        self.0["name"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::missing_field("name"))
    }

    fn url(&self) -> Result<String, ExtractionError> {
        self.0["url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::missing_field("url"))
    }
}

impl StreamInfoItemExtractor for StubItem<'_> {}

#[async_trait]
impl Extractor for StubListExtractor {
    fn service_id(&self) -> ServiceId {
        ServiceId::new(99)
    }

    fn link_handler(&self) -> &LinkHandler {
        &self.handler
    }

    fn is_fetched(&self) -> bool {
        self.state.is_fetched()
    }

    async fn fetch_page(&mut self) -> Result<(), ExtractionError> {
        let ctx = &self.ctx;
        self.state
            .fetch_once(|| Self::load(ctx, FIRST_PAGE))
            .await
    }

    fn name(&self) -> Result<String, ExtractionError> {
        self.state.get()?;
        Ok("stub list".to_string())
    }
}

#[async_trait]
impl ListExtractor for StubListExtractor {
    fn initial_page(&self) -> Result<InfoItemsPage, ExtractionError> {
        Self::page_from(self.state.get()?)
    }

    async fn fetch_continuation(
        &self,
        token: &ContinuationToken,
    ) -> Result<InfoItemsPage, ExtractionError> {
        let json = Self::load(&self.ctx, token.as_str()).await?;
        Self::page_from(&json)
    }
}

fn page(n: u32, next: &str) -> Value {
    json!({
        "items": [
            {"name": format!("item {n}a"), "url": format!("https://stub.test/v/{n}a")},
            {"name": format!("item {n}b"), "url": format!("https://stub.test/v/{n}b")}
        ],
        "next": next
    })
}

fn three_page_transport() -> Arc<ScriptedTransport> {
    Arc::new(
        ScriptedTransport::new()
            .with_json(FIRST_PAGE, &page(1, "https://stub.test/list?page=2"))
            .with_json("https://stub.test/list?page=2", &page(2, "https://stub.test/list?page=3"))
            .with_json("https://stub.test/list?page=3", &page(3, "")),
    )
}

#[tokio::test]
async fn test_walks_all_pages_until_token_is_absent() {
    let transport = three_page_transport();
    let mut extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));
    extractor.fetch_page().await.unwrap();

    let mut page = extractor.initial_page().unwrap();
    let mut items = page.items().to_vec();
    let mut get_page_calls = 0;
    while let Some(token) = page.next_page().cloned() {
        page = extractor.get_page(token.as_str()).await.unwrap();
        items.extend_from_slice(page.items());
        get_page_calls += 1;
    }

    assert_eq!(items.len(), 6);
    assert_eq!(items[0].name(), "item 1a");
    assert_eq!(items[5].name(), "item 3b");
    assert_eq!(get_page_calls, 2);
    assert!(page.next_page().is_none(), "empty next token means exhausted");
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_third_get_page_exhausts_listing() {
    let transport = three_page_transport();
    let extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));

    let mut token = Some(FIRST_PAGE.to_string());
    let mut items = Vec::new();
    let mut calls = 0;
    while let Some(raw) = token.take() {
        let page = extractor.get_page(&raw).await.unwrap();
        calls += 1;
        items.extend(page.items().iter().map(|item| item.url().to_string()));
        token = page.next_page().map(|next| next.as_str().to_string());
    }

    assert_eq!(calls, 3);
    assert_eq!(items.len(), 6);
    assert_eq!(items.last().map(String::as_str), Some("https://stub.test/v/3b"));
}

#[tokio::test]
async fn test_initial_page_issues_no_request() {
    let transport = three_page_transport();
    let mut extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));
    extractor.fetch_page().await.unwrap();

    let first = extractor.initial_page().unwrap();
    let again = extractor.initial_page().unwrap();
    assert_eq!(first.items(), again.items());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_empty_token_fails_before_any_request() {
    let transport = three_page_transport();
    let extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));

    let err = extractor.get_page("").await.unwrap_err();
    assert!(err.is_illegal_argument(), "{err}");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_each_get_page_is_a_fresh_request() {
    let transport = three_page_transport();
    let extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));

    let a = extractor.get_page("https://stub.test/list?page=2").await.unwrap();
    let b = extractor.get_page("https://stub.test/list?page=2").await.unwrap();
    assert_eq!(a.items(), b.items());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_page_level_failure_is_not_an_empty_page() {
    let transport = Arc::new(
        ScriptedTransport::new().with_response("https://stub.test/list?page=2", 503, ""),
    );
    let extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));

    let err = extractor
        .get_page("https://stub.test/list?page=2")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_page_getters_before_fetch_fail_with_not_fetched() {
    let transport = three_page_transport();
    let extractor = StubListExtractor::new(ExtractorContext::new(transport.clone()));

    assert!(extractor.initial_page().unwrap_err().is_illegal_argument());
    assert!(extractor.name().unwrap_err().is_illegal_argument());
    assert_eq!(extractor.id(), "list");
    assert_eq!(transport.calls(), 0);
}
