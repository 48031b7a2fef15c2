//! Link handling: raw user-facing URLs → canonical (id, url) pairs.
//!
//! A [`LinkHandlerFactory`] is the only place that knows a service's URL
//! shapes. It turns any recognized URL into a [`LinkHandler`] whose id is the
//! stable identifier of the entity and whose url is rebuilt from that id, so
//! everything downstream works on ids instead of ad hoc string matching.
//!
//! Resolution is deterministic and never touches the network.

pub mod utils;

use serde::Serialize;
use tracing::trace;
use url::Url;

use crate::error::ExtractionError;

/// Kind of entity a link points at.
///
/// Channels are the only entity with extractors, so they are the only kind a
/// factory can claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// A channel, uploader or conference
    Channel,
}

impl LinkType {
    /// Returns the stable lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel",
        }
    }
}

/// Canonical identity of one entity, derived purely from a URL or id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkHandler {
    original_url: String,
    url: String,
    id: String,
}

impl LinkHandler {
    /// Creates a handler. Prefer [`LinkHandlerFactory::from_url`].
    #[must_use]
    pub fn new(
        original_url: impl Into<String>,
        url: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            original_url: original_url.into(),
            url: url.into(),
            id: id.into(),
        }
    }

    /// The URL exactly as the caller supplied it (trimmed).
    #[must_use]
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// The normalized URL rebuilt from the id.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The canonical, stable identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Per-service, per-link-type URL knowledge.
///
/// Implementors supply [`id_from_url`](Self::id_from_url) and
/// [`url_from_id`](Self::url_from_id); the provided methods build handlers
/// from them so every service shares the same normalization rules.
pub trait LinkHandlerFactory: Send + Sync {
    /// The kind of entity this factory recognizes.
    fn link_type(&self) -> LinkType;

    /// Extracts the canonical id from a parsed URL.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when the URL is not one of this
    /// factory's shapes (wrong host, wrong path, malformed id).
    fn id_from_url(&self, url: &Url) -> Result<String, ExtractionError>;

    /// Builds the canonical URL for an id.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when the id is malformed.
    fn url_from_id(&self, id: &str) -> Result<String, ExtractionError>;

    /// Builds a handler from a raw URL. A missing scheme is read as `https://`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when the input is empty, not a URL,
    /// or not recognized by this factory.
    fn from_url(&self, raw: &str) -> Result<LinkHandler, ExtractionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::parsing(raw, "URL is empty"));
        }

        let parsed = utils::parse_lenient_url(trimmed)?;
        let id = self.id_from_url(&parsed)?;
        let url = self.url_from_id(&id)?;
        trace!(link_type = self.link_type().as_str(), id = %id, "Link resolved");
        Ok(LinkHandler::new(trimmed, url, id))
    }

    /// Builds a handler from a canonical id; the original URL is the canonical one.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parsing`] when the id is malformed.
    fn from_id(&self, id: &str) -> Result<LinkHandler, ExtractionError> {
        let url = self.url_from_id(id)?;
        Ok(LinkHandler::new(url.clone(), url, id))
    }

    /// Returns true if [`from_url`](Self::from_url) would succeed.
    fn accepts_url(&self, raw: &str) -> bool {
        self.from_url(raw).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Accepts `https://example.com/u/<digits>`.
    struct NumericUserLinks;

    impl LinkHandlerFactory for NumericUserLinks {
        fn link_type(&self) -> LinkType {
            LinkType::Channel
        }

        fn id_from_url(&self, url: &Url) -> Result<String, ExtractionError> {
            let mut segments = url
                .path_segments()
                .ok_or_else(|| ExtractionError::parsing(url.as_str(), "no path"))?;
            match (url.host_str(), segments.next(), segments.next()) {
                (Some("example.com"), Some("u"), Some(id)) => {
                    self.url_from_id(id)?;
                    Ok(id.to_string())
                }
                _ => Err(ExtractionError::parsing(url.as_str(), "not a user URL")),
            }
        }

        fn url_from_id(&self, id: &str) -> Result<String, ExtractionError> {
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
                return Err(ExtractionError::parsing(id, "user id must be numeric"));
            }
            Ok(format!("https://example.com/u/{id}"))
        }
    }

    #[test]
    fn test_from_url_normalizes_and_keeps_original() {
        let handler = NumericUserLinks
            .from_url("  http://example.com/u/42/about?tab=1 ")
            .unwrap();
        assert_eq!(handler.id(), "42");
        assert_eq!(handler.url(), "https://example.com/u/42");
        assert_eq!(handler.original_url(), "http://example.com/u/42/about?tab=1");
    }

    #[test]
    fn test_from_url_round_trips_through_canonical_url() {
        let first = NumericUserLinks.from_url("example.com/u/7").unwrap();
        let second = NumericUserLinks.from_url(first.url()).unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(first.url(), second.url());
    }

    #[test]
    fn test_from_url_rejects_non_numeric_id() {
        let err = NumericUserLinks
            .from_url("https://example.com/u/abc")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Parsing { .. }));
    }

    #[test]
    fn test_from_url_rejects_empty_input() {
        assert!(NumericUserLinks.from_url("   ").is_err());
        assert!(!NumericUserLinks.accepts_url(""));
    }

    #[test]
    fn test_from_id_uses_canonical_url_as_original() {
        let handler = NumericUserLinks.from_id("99").unwrap();
        assert_eq!(handler.original_url(), handler.url());
    }

    #[test]
    fn test_link_type_labels() {
        assert_eq!(LinkType::Channel.as_str(), "channel");
        assert_eq!(
            serde_json::to_string(&LinkType::Channel).unwrap(),
            "\"channel\""
        );
    }
}
