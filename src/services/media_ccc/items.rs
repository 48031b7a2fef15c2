//! Per-item extractor for conference events.

use serde_json::Value;

use super::conference::Conference;
use crate::error::ExtractionError;
use crate::info_item::{InfoItemExtractor, StreamInfoItemExtractor};

/// One entry of a conference's `events` array.
pub(crate) struct EventItem<'a> {
    event: &'a Value,
    conference: &'a Conference,
}

impl<'a> EventItem<'a> {
    pub(crate) fn new(event: &'a Value, conference: &'a Conference) -> Self {
        Self { event, conference }
    }

    fn str_field(&self, field: &str) -> Option<&'a str> {
        self.event.get(field).and_then(Value::as_str)
    }

    fn required(&self, field: &str) -> Result<String, ExtractionError> {
        self.str_field(field)
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::missing_field(field))
    }
}

impl InfoItemExtractor for EventItem<'_> {
    fn name(&self) -> Result<String, ExtractionError> {
        self.required("title")
    }

    fn url(&self) -> Result<String, ExtractionError> {
        self.required("frontend_link")
    }

    fn thumbnail_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self
            .str_field("thumb_url")
            .or_else(|| self.str_field("poster_url"))
            .map(str::to_string))
    }
}

impl StreamInfoItemExtractor for EventItem<'_> {
    fn duration_secs(&self) -> Result<Option<u64>, ExtractionError> {
        match self.event.get("length") {
            None | Some(Value::Null) => Ok(None),
            Some(length) => length
                .as_u64()
                .map(Some)
                .ok_or_else(|| ExtractionError::parsing("length", "expected seconds as an integer")),
        }
    }

    fn view_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(self.event.get("view_count").and_then(Value::as_u64))
    }

    fn uploader_name(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.conference.title.clone())
    }

    fn uploader_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self.conference.page_url())
    }

    fn upload_date(&self) -> Result<Option<String>, ExtractionError> {
        Ok(self
            .str_field("release_date")
            .or_else(|| self.str_field("date"))
            .map(str::to_string))
    }
}
