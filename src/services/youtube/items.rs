//! Per-item extractors for grid renderers.

use serde_json::Value;
use tracing::trace;

use super::parsing::{CountFormat, last_thumbnail, str_at, text_of};
use crate::error::ExtractionError;
use crate::info_item::{
    InfoItemExtractor, InfoItemsCollector, ItemSource, PlaylistInfoItemExtractor,
    StreamInfoItemExtractor, StreamType,
};
use crate::link_handler::utils::parse_duration_text;

/// Renderers YouTube uses for ads and promoted slots inside grids.
const AD_RENDERERS: [&str; 2] = ["promotedVideoRenderer", "adSlotRenderer"];

/// Channel the grid belongs to, for uploader fields.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Uploader<'a> {
    pub name: Option<&'a str>,
    pub url: &'a str,
}

/// What every item in one grid shares.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GridContext<'a> {
    pub uploader: Uploader<'a>,
    pub counts: CountFormat,
}

/// Commits every grid entry to `collector`, in order.
///
/// Video and playlist renderers become items, ad renderers are committed as
/// ads so the collector skips them, and anything else (continuation
/// placeholders, shelves) is ignored.
pub(crate) fn collect_grid_items(
    collector: &mut InfoItemsCollector,
    items: &[Value],
    grid: GridContext<'_>,
) -> Result<(), ExtractionError> {
    for entry in items {
        if let Some(renderer) = entry.get("gridVideoRenderer") {
            collector.commit(ItemSource::Stream(&GridVideoItem { renderer, grid }))?;
        } else if let Some(renderer) = entry.get("gridPlaylistRenderer") {
            collector.commit(ItemSource::Playlist(&GridPlaylistItem { renderer, grid }))?;
        } else if AD_RENDERERS.iter().any(|key| entry.get(key).is_some()) {
            collector.commit(ItemSource::Stream(&AdSlot))?;
        } else {
            trace!("Ignoring unknown grid entry");
        }
    }
    Ok(())
}

fn required_text(renderer: &Value, field: &str) -> Result<String, ExtractionError> {
    renderer
        .get(field)
        .and_then(text_of)
        .ok_or_else(|| ExtractionError::missing_field(field))
}

fn required_str<'a>(renderer: &'a Value, field: &str) -> Result<&'a str, ExtractionError> {
    str_at(renderer, &format!("/{field}")).ok_or_else(|| ExtractionError::missing_field(field))
}

struct GridVideoItem<'a> {
    renderer: &'a Value,
    grid: GridContext<'a>,
}

impl InfoItemExtractor for GridVideoItem<'_> {
    fn name(&self) -> Result<String, ExtractionError> {
        required_text(self.renderer, "title")
    }

    fn url(&self) -> Result<String, ExtractionError> {
        let id = required_str(self.renderer, "videoId")?;
        Ok(format!("https://www.youtube.com/watch?v={id}"))
    }

    fn thumbnail_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(last_thumbnail(self.renderer, "/thumbnail"))
    }
}

impl GridVideoItem<'_> {
    fn overlay_style(&self) -> Option<&str> {
        self.renderer
            .get("thumbnailOverlays")?
            .as_array()?
            .iter()
            .find_map(|overlay| str_at(overlay, "/thumbnailOverlayTimeStatusRenderer/style"))
    }

    fn is_live(&self) -> bool {
        let live_badge = self
            .renderer
            .get("badges")
            .and_then(Value::as_array)
            .is_some_and(|badges| {
                badges.iter().any(|badge| {
                    str_at(badge, "/metadataBadgeRenderer/style") == Some("BADGE_STYLE_TYPE_LIVE_NOW")
                })
            });
        live_badge || self.overlay_style() == Some("LIVE")
    }
}

impl StreamInfoItemExtractor for GridVideoItem<'_> {
    fn stream_type(&self) -> Result<StreamType, ExtractionError> {
        Ok(if self.is_live() {
            StreamType::Live
        } else {
            StreamType::Video
        })
    }

    fn duration_secs(&self) -> Result<Option<u64>, ExtractionError> {
        if self.is_live() {
            return Ok(None);
        }
        let overlay_text = self
            .renderer
            .get("thumbnailOverlays")
            .and_then(Value::as_array)
            .and_then(|overlays| {
                overlays
                    .iter()
                    .find_map(|o| o.pointer("/thumbnailOverlayTimeStatusRenderer/text"))
            });
        // Overlays such as "SHORTS" or "PREMIERE" carry no clock time.
        Ok(self
            .renderer
            .get("lengthText")
            .or(overlay_text)
            .and_then(text_of)
            .and_then(|text| parse_duration_text(&text)))
    }

    fn view_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(self
            .renderer
            .get("viewCountText")
            .and_then(text_of)
            .and_then(|text| self.grid.counts.parse(&text)))
    }

    fn uploader_name(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.grid.uploader.name.map(str::to_string))
    }

    fn uploader_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(Some(self.grid.uploader.url.to_string()))
    }

    fn upload_date(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.renderer.get("publishedTimeText").and_then(text_of))
    }
}

struct GridPlaylistItem<'a> {
    renderer: &'a Value,
    grid: GridContext<'a>,
}

impl InfoItemExtractor for GridPlaylistItem<'_> {
    fn name(&self) -> Result<String, ExtractionError> {
        required_text(self.renderer, "title")
    }

    fn url(&self) -> Result<String, ExtractionError> {
        let id = required_str(self.renderer, "playlistId")?;
        Ok(format!("https://www.youtube.com/playlist?list={id}"))
    }

    fn thumbnail_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(last_thumbnail(self.renderer, "/thumbnail"))
    }
}

impl PlaylistInfoItemExtractor for GridPlaylistItem<'_> {
    fn uploader_name(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.grid.uploader.name.map(str::to_string))
    }

    fn stream_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(["videoCountShortText", "videoCountText"]
            .iter()
            .find_map(|field| self.renderer.get(field).and_then(text_of))
            .and_then(|text| self.grid.counts.parse(&text)))
    }
}

/// Placeholder committed for ad renderers; never becomes an item.
struct AdSlot;

impl InfoItemExtractor for AdSlot {
    fn name(&self) -> Result<String, ExtractionError> {
        Err(ExtractionError::missing_field("title"))
    }

    fn url(&self) -> Result<String, ExtractionError> {
        Err(ExtractionError::missing_field("url"))
    }

    fn is_ad(&self) -> bool {
        true
    }
}

impl StreamInfoItemExtractor for AdSlot {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::info_item::InfoItem;
    use crate::service::ServiceId;
    use serde_json::json;

    const UPLOADER: Uploader<'static> = Uploader {
        name: Some("Channel"),
        url: "https://www.youtube.com/channel/UCsXVk37bltHxD1rDPwtNM8Q",
    };

    fn collect_with(items: &Value, counts: CountFormat) -> InfoItemsCollector {
        let mut collector = InfoItemsCollector::new(ServiceId::YOUTUBE);
        let grid = GridContext { uploader: UPLOADER, counts };
        collect_grid_items(&mut collector, items.as_array().unwrap(), grid).unwrap();
        collector
    }

    fn collect(items: &Value) -> InfoItemsCollector {
        collect_with(items, CountFormat::English)
    }

    #[test]
    fn test_grid_video_fields() {
        let items = json!([{"gridVideoRenderer": {
            "videoId": "abc",
            "title": {"runs": [{"text": "Talk"}]},
            "thumbnail": {"thumbnails": [{"url": "https://i/1.jpg"}, {"url": "https://i/2.jpg"}]},
            "viewCountText": {"simpleText": "1,234 views"},
            "publishedTimeText": {"simpleText": "2 days ago"},
            "thumbnailOverlays": [{"thumbnailOverlayTimeStatusRenderer": {"text": {"simpleText": "12:03"}, "style": "DEFAULT"}}]
        }}]);
        let collector = collect(&items);
        match &collector.items()[0] {
            InfoItem::Stream(stream) => {
                assert_eq!(stream.common.name, "Talk");
                assert_eq!(stream.common.url, "https://www.youtube.com/watch?v=abc");
                assert_eq!(stream.common.thumbnail_url.as_deref(), Some("https://i/2.jpg"));
                assert_eq!(stream.view_count, Some(1234));
                assert_eq!(stream.duration_secs, Some(723));
                assert_eq!(stream.stream_type, StreamType::Video);
                assert_eq!(stream.uploader_name.as_deref(), Some("Channel"));
                assert_eq!(stream.upload_date.as_deref(), Some("2 days ago"));
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_live_video_has_no_duration() {
        let items = json!([{"gridVideoRenderer": {
            "videoId": "live", "title": {"simpleText": "Live"},
            "badges": [{"metadataBadgeRenderer": {"style": "BADGE_STYLE_TYPE_LIVE_NOW"}}]
        }}]);
        let collector = collect(&items);
        match &collector.items()[0] {
            InfoItem::Stream(stream) => {
                assert_eq!(stream.stream_type, StreamType::Live);
                assert_eq!(stream.duration_secs, None);
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_grid_playlist_fields() {
        let items = json!([{"gridPlaylistRenderer": {
            "playlistId": "PL1", "title": {"simpleText": "Series"},
            "videoCountShortText": {"simpleText": "14"}
        }}]);
        let collector = collect(&items);
        match &collector.items()[0] {
            InfoItem::Playlist(playlist) => {
                assert_eq!(playlist.common.url, "https://www.youtube.com/playlist?list=PL1");
                assert_eq!(playlist.stream_count, Some(14));
                assert_eq!(playlist.uploader_name.as_deref(), Some("Channel"));
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_localized_counts_are_absent() {
        let items = json!([
            {"gridVideoRenderer": {
                "videoId": "abc", "title": {"simpleText": "Vortrag"},
                "viewCountText": {"simpleText": "1.234 Aufrufe"},
                "lengthText": {"simpleText": "4:05"}
            }},
            {"gridPlaylistRenderer": {
                "playlistId": "PL1", "title": {"simpleText": "Reihe"},
                "videoCountShortText": {"simpleText": "14"}
            }}
        ]);
        let collector = collect_with(&items, CountFormat::Localized);
        assert_eq!(collector.len(), 2);
        match &collector.items()[0] {
            InfoItem::Stream(stream) => {
                assert_eq!(stream.view_count, None);
                assert_eq!(stream.duration_secs, Some(245));
            }
            other => panic!("unexpected item {other:?}"),
        }
        match &collector.items()[1] {
            InfoItem::Playlist(playlist) => assert_eq!(playlist.stream_count, None),
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_ads_skipped_and_broken_items_recorded() {
        let items = json!([
            {"promotedVideoRenderer": {}},
            {"gridVideoRenderer": {"title": {"simpleText": "no id"}}},
            {"adSlotRenderer": {}},
            {"gridPlaylistRenderer": {"playlistId": "PL2", "title": {"simpleText": "ok"}}},
            {"continuationItemRenderer": {}}
        ]);
        let collector = collect(&items);
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.errors().len(), 1);
        assert_eq!(collector.errors()[0].position, 1);
    }
}
