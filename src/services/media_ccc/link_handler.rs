//! media.ccc.de conference URLs.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::ExtractionError;
use crate::link_handler::utils::{compile_static_regex, host_is_one_of, path_segments};
use crate::link_handler::{LinkHandlerFactory, LinkType};

const FRONTEND_HOST: &str = "media.ccc.de";
const API_HOST: &str = "api.media.ccc.de";

/// Conference acronyms: `36c3`, `froscon2019`, `gpn19`, `ds2017-de`.
static ACRONYM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^[A-Za-z0-9][A-Za-z0-9._-]*$"));

/// Recognizes conference links on the frontend and the public API:
///
/// - `https://media.ccc.de/c/{acronym}[/...]`
/// - `https://media.ccc.de/public/conferences/{acronym}`
/// - `https://api.media.ccc.de/public/conferences/{acronym}`
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaCccConferenceLinkHandlerFactory;

impl MediaCccConferenceLinkHandlerFactory {
    /// Canonical conference page for an already validated acronym.
    pub(crate) fn conference_url(acronym: &str) -> String {
        format!("https://{FRONTEND_HOST}/c/{acronym}")
    }
}

impl LinkHandlerFactory for MediaCccConferenceLinkHandlerFactory {
    fn link_type(&self) -> LinkType {
        LinkType::Channel
    }

    fn id_from_url(&self, url: &Url) -> Result<String, ExtractionError> {
        let segments = path_segments(url);
        let acronym = if host_is_one_of(url, &[FRONTEND_HOST]) {
            match segments.as_slice() {
                ["c", acronym, ..] | ["public", "conferences", acronym] => *acronym,
                _ => return Err(ExtractionError::parsing(url.as_str(), "not a conference URL")),
            }
        } else if host_is_one_of(url, &[API_HOST]) {
            match segments.as_slice() {
                ["public", "conferences", acronym] => *acronym,
                _ => return Err(ExtractionError::parsing(url.as_str(), "not a conference API URL")),
            }
        } else {
            return Err(ExtractionError::parsing(url.as_str(), "not a media.ccc.de host"));
        };

        self.url_from_id(acronym)?;
        Ok(acronym.to_string())
    }

    fn url_from_id(&self, id: &str) -> Result<String, ExtractionError> {
        if !ACRONYM_PATTERN.is_match(id) {
            return Err(ExtractionError::parsing(id, "not a conference acronym"));
        }
        Ok(Self::conference_url(id))
    }
}
