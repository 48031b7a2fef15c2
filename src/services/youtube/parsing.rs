//! Navigation helpers for YouTube's `pbj=1` browse responses.

use serde_json::Value;
use tracing::{debug, warn};

use crate::channel::{ChannelTab, TabContent};
use crate::error::ExtractionError;
use crate::extractor::{ContinuationToken, ExtractorContext};
use crate::link_handler::utils::parse_count;
use crate::localization::Localization;

/// Client identification the `pbj=1` endpoints expect.
const CLIENT_HEADERS: [(&str, &str); 2] = [
    ("X-YouTube-Client-Name", "1"),
    ("X-YouTube-Client-Version", "2.20200214.04.00"),
];

const GRID_RENDERER: &str = "/content/sectionListRenderer/contents/0/itemSectionRenderer/contents/0/gridRenderer";
/// Placeholder YouTube renders in place of a grid for an empty tab.
/// Its text follows `hl`, so only its presence is meaningful.
const TAB_MESSAGE: &str =
    "/content/sectionListRenderer/contents/0/itemSectionRenderer/contents/0/messageRenderer";

/// Appends `hl`/`gl` for the requested localization.
pub(crate) fn localized_query(ctx: &ExtractorContext) -> String {
    let language = urlencoding::encode(&ctx.localization.language);
    match &ctx.localization.country {
        Some(country) => format!("&hl={language}&gl={}", urlencoding::encode(country)),
        None => format!("&hl={language}"),
    }
}

/// How count text in a response can be read.
///
/// YouTube formats counts for the requested `hl`; only English text has a
/// known number format, so other languages yield no counts at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountFormat {
    English,
    Localized,
}

impl CountFormat {
    pub(crate) fn of(localization: &Localization) -> Self {
        if localization.is_english() {
            Self::English
        } else {
            Self::Localized
        }
    }

    pub(crate) fn parse(self, text: &str) -> Option<u64> {
        match self {
            Self::English => parse_count(text),
            Self::Localized => None,
        }
    }
}

/// Fetches a browse URL and returns its `response` object.
///
/// The endpoint answers with a JSON array whose second element carries the
/// page; anything else is a malformed response.
pub(crate) async fn fetch_browse_response(
    ctx: &ExtractorContext,
    url: &str,
) -> Result<Value, ExtractionError> {
    let response = ctx.transport.get(url, &CLIENT_HEADERS).await?.ensure_success()?;
    let mut json = response.json()?;
    match json.pointer_mut("/1/response").map(Value::take) {
        Some(page) if page.is_object() => Ok(page),
        _ => Err(ExtractionError::malformed_response(
            &response.url,
            "expected a JSON array with a 'response' object at index 1",
        )),
    }
}

/// Reads formatted text: `simpleText`, or the concatenation of `runs`.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    if let Some(text) = value.get("simpleText").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    let runs = value.get("runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

/// Reads a string at a JSON pointer.
pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Reads the first thumbnail of a `thumbnails` list, fixing protocol-relative URLs.
pub(crate) fn first_thumbnail(value: &Value, pointer: &str) -> Option<String> {
    str_at(value, &format!("{pointer}/thumbnails/0/url")).map(fix_protocol_relative)
}

/// Reads the last (largest) thumbnail of a `thumbnails` list.
pub(crate) fn last_thumbnail(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(&format!("{pointer}/thumbnails"))?
        .as_array()?
        .last()?
        .get("url")?
        .as_str()
        .map(fix_protocol_relative)
}

fn fix_protocol_relative(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    }
}

/// Channel title from the response metadata.
pub(crate) fn channel_title(response: &Value) -> Option<&str> {
    str_at(response, "/metadata/channelMetadataRenderer/title")
}

/// Fails when the response carries an error alert (terminated, unavailable).
pub(crate) fn check_alerts(response: &Value, url: &str) -> Result<(), ExtractionError> {
    let Some(alerts) = response.get("alerts").and_then(Value::as_array) else {
        return Ok(());
    };
    for alert in alerts {
        let Some(renderer) = alert
            .get("alertRenderer")
            .or_else(|| alert.get("alertWithButtonRenderer"))
        else {
            continue;
        };
        let text = renderer.get("text").and_then(text_of).unwrap_or_default();
        if renderer.get("type").and_then(Value::as_str) == Some("ERROR") {
            warn!(url, alert = %text, "Service reported an error alert");
            return Err(ExtractionError::content_not_available(url, &text));
        }
        debug!(url, alert = %text, "Ignoring non-error alert");
    }
    Ok(())
}

/// Locates a tab in a browse response.
///
/// A tab whose content slot holds a message instead of a grid is
/// [`TabContent::Empty`], in any language; a tab missing from the tab bar
/// is [`TabContent::Absent`].
pub(crate) fn find_tab(response: &Value, tab: ChannelTab) -> TabContent<&Value> {
    let Some(tabs) = response
        .pointer("/contents/twoColumnBrowseResultsRenderer/tabs")
        .and_then(Value::as_array)
    else {
        return TabContent::Absent;
    };

    let found = tabs.iter().filter_map(|t| t.get("tabRenderer")).find(|renderer| {
        str_at(renderer, "/endpoint/commandMetadata/webCommandMetadata/url")
            .is_some_and(|url| url.ends_with(tab.as_str()))
    });

    match found {
        None => TabContent::Absent,
        Some(renderer) => {
            let empty = renderer.pointer(GRID_RENDERER).is_none()
                && renderer.pointer(TAB_MESSAGE).is_some();
            if empty {
                TabContent::Empty
            } else {
                TabContent::Listed(renderer)
            }
        }
    }
}

/// Returns true when a tab renderer already carries its content.
pub(crate) fn has_content(tab_renderer: &Value) -> bool {
    tab_renderer.get("content").is_some()
}

/// The grid listing inside a tab renderer.
pub(crate) fn grid_renderer(tab_renderer: &Value) -> Option<&Value> {
    tab_renderer.pointer(GRID_RENDERER)
}

/// Builds the `browse_ajax` URL for the next page from a `continuations` array.
pub(crate) fn continuation_from(
    base_url: &str,
    continuations: Option<&Value>,
) -> Option<ContinuationToken> {
    let data = continuations?.pointer("/0/nextContinuationData")?;
    let continuation = urlencoding::encode(data.get("continuation")?.as_str()?);
    let click_tracking = data
        .get("clickTrackingParams")
        .and_then(Value::as_str)
        .unwrap_or_default();
    ContinuationToken::new(format!(
        "{base_url}/browse_ajax?ctoken={continuation}&continuation={continuation}&itct={}",
        urlencoding::encode(click_tracking)
    ))
}
