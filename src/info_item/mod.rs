//! Uniform item model shared by every service.
//!
//! Services never build [`InfoItem`]s themselves. They wrap each raw source
//! object in a per-item extractor (one of the `*InfoItemExtractor` traits) and
//! hand it to an [`InfoItemsCollector`], which reads the getters, applies the
//! per-item error policy and assembles the item. The item structs are
//! `#[non_exhaustive]`, so code outside this crate cannot construct them.

mod collector;

pub use collector::{CommitOutcome, InfoItemsCollector, ItemError, SkipReason};

use serde::Serialize;

use crate::error::ExtractionError;
use crate::service::ServiceId;

/// Kind tag of an [`InfoItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    Stream,
    Playlist,
    Channel,
    Comment,
}

/// How a stream is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    Video,
    Audio,
    Live,
}

/// One extracted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InfoItem {
    Stream(StreamInfoItem),
    Playlist(PlaylistInfoItem),
    Channel(ChannelInfoItem),
    Comment(CommentInfoItem),
}

impl InfoItem {
    /// The kind tag.
    #[must_use]
    pub fn info_type(&self) -> InfoType {
        match self {
            Self::Stream(_) => InfoType::Stream,
            Self::Playlist(_) => InfoType::Playlist,
            Self::Channel(_) => InfoType::Channel,
            Self::Comment(_) => InfoType::Comment,
        }
    }

    fn common(&self) -> &CommonFields {
        match self {
            Self::Stream(item) => &item.common,
            Self::Playlist(item) => &item.common,
            Self::Channel(item) => &item.common,
            Self::Comment(item) => &item.common,
        }
    }

    /// The service the item came from.
    #[must_use]
    pub fn service_id(&self) -> ServiceId {
        self.common().service_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.common().name
    }

    /// Canonical URL of the item.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.common().url
    }

    /// Thumbnail URL, when the service provides one.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.common().thumbnail_url.as_deref()
    }
}

/// Fields every item kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct CommonFields {
    pub service_id: ServiceId,
    pub name: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct StreamInfoItem {
    #[serde(flatten)]
    pub common: CommonFields,
    pub stream_type: StreamType,
    pub duration_secs: Option<u64>,
    pub view_count: Option<u64>,
    pub uploader_name: Option<String>,
    pub uploader_url: Option<String>,
    /// Upload date as the service renders it (absolute or relative text).
    pub upload_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct PlaylistInfoItem {
    #[serde(flatten)]
    pub common: CommonFields,
    pub uploader_name: Option<String>,
    pub stream_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ChannelInfoItem {
    #[serde(flatten)]
    pub common: CommonFields,
    pub description: Option<String>,
    pub subscriber_count: Option<u64>,
    pub stream_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct CommentInfoItem {
    #[serde(flatten)]
    pub common: CommonFields,
    pub comment_id: String,
    pub text: String,
    pub like_count: Option<u64>,
}

/// Getters every per-item extractor provides.
pub trait InfoItemExtractor {
    /// Display name; required.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when the field is missing.
    fn name(&self) -> Result<String, ExtractionError>;

    /// Canonical item URL; required.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when the field is missing.
    fn url(&self) -> Result<String, ExtractionError>;

    /// Thumbnail URL.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when present but malformed.
    fn thumbnail_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }

    /// Returns true for ads and promoted placeholders, which collectors skip.
    fn is_ad(&self) -> bool {
        false
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait StreamInfoItemExtractor: InfoItemExtractor {
    fn stream_type(&self) -> Result<StreamType, ExtractionError> {
        Ok(StreamType::Video)
    }
    fn duration_secs(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }
    fn view_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }
    fn uploader_name(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
    fn uploader_url(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
    fn upload_date(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait PlaylistInfoItemExtractor: InfoItemExtractor {
    fn uploader_name(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
    fn stream_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait ChannelInfoItemExtractor: InfoItemExtractor {
    fn description(&self) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
    fn subscriber_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }
    fn stream_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait CommentInfoItemExtractor: InfoItemExtractor {
    fn comment_id(&self) -> Result<String, ExtractionError>;
    fn text(&self) -> Result<String, ExtractionError>;
    fn like_count(&self) -> Result<Option<u64>, ExtractionError> {
        Ok(None)
    }
}

/// A raw source object, wrapped in the per-item extractor for its kind.
#[derive(Clone, Copy)]
pub enum ItemSource<'a> {
    Stream(&'a dyn StreamInfoItemExtractor),
    Playlist(&'a dyn PlaylistInfoItemExtractor),
    Channel(&'a dyn ChannelInfoItemExtractor),
    Comment(&'a dyn CommentInfoItemExtractor),
}

impl ItemSource<'_> {
    fn is_ad(&self) -> bool {
        match self {
            Self::Stream(source) => source.is_ad(),
            Self::Playlist(source) => source.is_ad(),
            Self::Channel(source) => source.is_ad(),
            Self::Comment(source) => source.is_ad(),
        }
    }

    fn build(&self, service_id: ServiceId) -> Result<InfoItem, ExtractionError> {
        Ok(match self {
            Self::Stream(source) => InfoItem::Stream(StreamInfoItem {
                common: common_fields(*source, service_id)?,
                stream_type: source.stream_type()?,
                duration_secs: source.duration_secs()?,
                view_count: source.view_count()?,
                uploader_name: source.uploader_name()?,
                uploader_url: source.uploader_url()?,
                upload_date: source.upload_date()?,
            }),
            Self::Playlist(source) => InfoItem::Playlist(PlaylistInfoItem {
                common: common_fields(*source, service_id)?,
                uploader_name: source.uploader_name()?,
                stream_count: source.stream_count()?,
            }),
            Self::Channel(source) => InfoItem::Channel(ChannelInfoItem {
                common: common_fields(*source, service_id)?,
                description: source.description()?,
                subscriber_count: source.subscriber_count()?,
                stream_count: source.stream_count()?,
            }),
            Self::Comment(source) => InfoItem::Comment(CommentInfoItem {
                common: common_fields(*source, service_id)?,
                comment_id: source.comment_id()?,
                text: source.text()?,
                like_count: source.like_count()?,
            }),
        })
    }
}

fn common_fields<E: InfoItemExtractor + ?Sized>(
    source: &E,
    service_id: ServiceId,
) -> Result<CommonFields, ExtractionError> {
    Ok(CommonFields {
        service_id,
        name: source.name()?,
        url: source.url()?,
        thumbnail_url: source.thumbnail_url()?,
    })
}
