//! YouTube channel URLs.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::ExtractionError;
use crate::link_handler::utils::{compile_static_regex, host_is_one_of, path_segments};
use crate::link_handler::{LinkHandlerFactory, LinkType};

/// Hosts that serve channel pages.
const CHANNEL_HOSTS: [&str; 3] = ["youtube.com", "m.youtube.com", "music.youtube.com"];

/// `UC` followed by 22 base64url characters.
static CHANNEL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^UC[A-Za-z0-9_-]{22}$"));

/// Recognizes `/channel/UC…` links on YouTube hosts.
///
/// Vanity forms (`/user/…`, `/c/…`, `/@handle`) are rejected: turning a
/// slug into a channel id needs a request, and link handling never does I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct YoutubeChannelLinkHandlerFactory;

impl YoutubeChannelLinkHandlerFactory {
    /// Canonical channel URL for an already validated id.
    pub(crate) fn channel_url(id: &str) -> String {
        format!("https://www.youtube.com/channel/{id}")
    }
}

impl LinkHandlerFactory for YoutubeChannelLinkHandlerFactory {
    fn link_type(&self) -> LinkType {
        LinkType::Channel
    }

    fn id_from_url(&self, url: &Url) -> Result<String, ExtractionError> {
        if !host_is_one_of(url, &CHANNEL_HOSTS) {
            return Err(ExtractionError::parsing(url.as_str(), "not a YouTube host"));
        }

        match path_segments(url).as_slice() {
            ["channel", id, ..] => {
                if CHANNEL_ID_PATTERN.is_match(id) {
                    Ok((*id).to_string())
                } else {
                    Err(ExtractionError::parsing(
                        url.as_str(),
                        &format!("'{id}' is not a channel id"),
                    ))
                }
            }
            ["user" | "c", ..] => Err(ExtractionError::parsing(
                url.as_str(),
                "vanity channel URLs are not supported; use the /channel/UC... URL",
            )),
            [first, ..] if first.starts_with('@') => Err(ExtractionError::parsing(
                url.as_str(),
                "channel handles are not supported; use the /channel/UC... URL",
            )),
            _ => Err(ExtractionError::parsing(url.as_str(), "not a channel URL")),
        }
    }

    fn url_from_id(&self, id: &str) -> Result<String, ExtractionError> {
        if !CHANNEL_ID_PATTERN.is_match(id) {
            return Err(ExtractionError::parsing(id, "not a channel id"));
        }
        Ok(Self::channel_url(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ID: &str = "UCsXVk37bltHxD1rDPwtNM8Q";

    #[test]
    fn test_channel_url_variants_resolve_to_same_id() {
        let factory = YoutubeChannelLinkHandlerFactory;
        for raw in [
            format!("https://www.youtube.com/channel/{ID}"),
            format!("http://youtube.com/channel/{ID}/videos"),
            format!("https://m.youtube.com/channel/{ID}?view=0"),
            format!("music.youtube.com/channel/{ID}"),
        ] {
            let handler = factory.from_url(&raw).unwrap();
            assert_eq!(handler.id(), ID, "{raw}");
            assert_eq!(
                handler.url(),
                format!("https://www.youtube.com/channel/{ID}")
            );
        }
    }

    #[test]
    fn test_canonical_url_round_trips() {
        let factory = YoutubeChannelLinkHandlerFactory;
        let first = factory
            .from_url(&format!("https://m.youtube.com/channel/{ID}/playlists"))
            .unwrap();
        let second = factory.from_url(first.url()).unwrap();
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn test_rejects_slugs_and_handles() {
        let factory = YoutubeChannelLinkHandlerFactory;
        for raw in [
            "https://www.youtube.com/user/Kurzgesagt",
            "https://www.youtube.com/c/inanutshell",
            "https://www.youtube.com/@kurzgesagt",
        ] {
            let err = factory.from_url(raw).unwrap_err();
            assert!(matches!(err, ExtractionError::Parsing { .. }), "{raw}");
        }
    }

    #[test]
    fn test_rejects_malformed_id_and_foreign_host() {
        let factory = YoutubeChannelLinkHandlerFactory;
        assert!(!factory.accepts_url("https://www.youtube.com/channel/UCshort"));
        assert!(!factory.accepts_url(&format!("https://vimeo.com/channel/{ID}")));
        assert!(!factory.accepts_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_from_id() {
        let handler = YoutubeChannelLinkHandlerFactory.from_id(ID).unwrap();
        assert_eq!(handler.original_url(), handler.url());
        assert!(YoutubeChannelLinkHandlerFactory.from_id("nope").is_err());
    }
}
