//! Composite channel extractors: one entity, several independently paginated tabs.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ExtractionError;
use crate::extractor::{Extractor, ListExtractor};

/// A named, paginated section of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelTab {
    Videos,
    Playlists,
    Shorts,
    Livestreams,
    Events,
}

impl ChannelTab {
    /// Stable lowercase label, also used as the URL path suffix on YouTube.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Videos => "videos",
            Self::Playlists => "playlists",
            Self::Shorts => "shorts",
            Self::Livestreams => "streams",
            Self::Events => "events",
        }
    }
}

impl fmt::Display for ChannelTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelTab {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "videos" => Ok(Self::Videos),
            "playlists" => Ok(Self::Playlists),
            "shorts" => Ok(Self::Shorts),
            "streams" | "livestreams" | "live" => Ok(Self::Livestreams),
            "events" => Ok(Self::Events),
            other => Err(ExtractionError::illegal_argument(&format!(
                "unknown channel tab '{other}'"
            ))),
        }
    }
}

/// What a service response says about one listing.
///
/// Keeps "the service reported nothing here" apart from "the structure was
/// not found", so neither has to be inferred from an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent<T> {
    /// The listing exists and holds content.
    Listed(T),
    /// The service explicitly reports the listing as empty.
    Empty,
    /// The response does not contain the listing at all.
    Absent,
}

impl<T> TabContent<T> {
    /// Returns true unless the listing is absent.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Maps the listed content.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TabContent<U> {
        match self {
            Self::Listed(value) => TabContent::Listed(f(value)),
            Self::Empty => TabContent::Empty,
            Self::Absent => TabContent::Absent,
        }
    }
}

/// A channel, uploader or conference.
///
/// Metadata getters return `Ok(None)` when the service has no value for the
/// field. All of them fail with the usual lifecycle errors before a fetch.
#[allow(clippy::missing_errors_doc)]
pub trait ChannelExtractor: Extractor {
    fn avatar_url(&self) -> Result<Option<String>, ExtractionError>;

    fn banner_url(&self) -> Result<Option<String>, ExtractionError>;

    /// Feed (RSS/Atom) URL of the channel's uploads.
    fn feed_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }

    fn subscriber_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }

    fn description(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }

    /// Tabs present in the fetched response, in the service's order.
    ///
    /// Tabs the service reports as empty are included and yield a terminal
    /// empty page; tabs missing from the response are omitted. A tab whose
    /// content arrived with the channel response is already fetched; the
    /// others load their own page on `fetch_page`.
    fn tabs(&self) -> Result<Vec<Box<dyn ChannelTabExtractor>>, ExtractionError>;
}

/// One paginated tab of a channel.
pub trait ChannelTabExtractor: ListExtractor {
    fn tab(&self) -> ChannelTab;
}

impl fmt::Debug for dyn ChannelTabExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTabExtractor")
            .field("tab", &self.tab())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_tab_parse_and_display() {
        for tab in [
            ChannelTab::Videos,
            ChannelTab::Playlists,
            ChannelTab::Shorts,
            ChannelTab::Livestreams,
            ChannelTab::Events,
        ] {
            assert_eq!(tab.to_string().parse::<ChannelTab>().unwrap(), tab);
        }
        assert_eq!(" Videos ".parse::<ChannelTab>().unwrap(), ChannelTab::Videos);
    }

    #[test]
    fn test_channel_tab_unknown_is_illegal_argument() {
        let err = "about".parse::<ChannelTab>().unwrap_err();
        assert!(err.is_illegal_argument());
    }

    #[test]
    fn test_tab_content_presence_and_map() {
        assert!(TabContent::Listed(1).is_present());
        assert!(TabContent::<u8>::Empty.is_present());
        assert!(!TabContent::<u8>::Absent.is_present());
        assert_eq!(TabContent::Listed(2).map(|v| v * 2), TabContent::Listed(4));
        assert_eq!(TabContent::<u8>::Empty.map(|v| v * 2), TabContent::Empty);
    }
}
