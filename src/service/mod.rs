//! Streaming services and the process-wide registry that owns them.
//!
//! # Architecture
//!
//! - [`StreamingService`] - Per-service factories for link handlers and extractors
//! - [`ServiceRegistry`] - Ordered table of services with URL resolution
//! - [`services`] - The built-in registry, initialized once and read-only afterwards
//!
//! # Example
//!
//! ```
//! use pipe_extractor::{LinkType, ServiceId, services};
//!
//! let link = services()
//!     .resolve_url("https://media.ccc.de/c/36c3")
//!     .unwrap();
//! assert_eq!(link.service_id, ServiceId::MEDIA_CCC);
//! assert_eq!(link.link_type, LinkType::Channel);
//! assert_eq!(link.handler.id(), "36c3");
//! ```

mod registry;

pub use registry::ServiceRegistry;

use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::channel::{ChannelExtractor, ChannelTab, ChannelTabExtractor};
use crate::error::ExtractionError;
use crate::extractor::ExtractorContext;
use crate::link_handler::{LinkHandler, LinkHandlerFactory, LinkType};
use crate::services::media_ccc::MediaCccService;
use crate::services::youtube::YoutubeService;

/// Numeric identifier of a streaming service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServiceId(u32);

impl ServiceId {
    pub const YOUTUBE: Self = Self(0);
    /// Reserved; no built-in service registers it.
    pub const SOUNDCLOUD: Self = Self(1);
    pub const MEDIA_CCC: Self = Self(2);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A link some service recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub service_id: ServiceId,
    pub link_type: LinkType,
    pub handler: LinkHandler,
}

/// One independent source of content.
///
/// A service owns its URL knowledge (link handler factories) and builds the
/// extractors for the link types it supports. Factories only construct;
/// nothing touches the network until the caller fetches.
pub trait StreamingService: Send + Sync {
    fn service_id(&self) -> ServiceId;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Link handler factories, tried in order during resolution.
    fn link_handler_factories(&self) -> Vec<&dyn LinkHandlerFactory>;

    /// Builds a channel extractor for a handler this service produced.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::ExtractionNotSupported`] when the service has
    /// no channels.
    fn channel_extractor(
        &self,
        handler: LinkHandler,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelExtractor>, ExtractionError>;

    /// Builds a single tab extractor that fetches its own page.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::ExtractionNotSupported`] when the service
    /// does not offer `tab`.
    fn channel_tab_extractor(
        &self,
        handler: LinkHandler,
        tab: ChannelTab,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelTabExtractor>, ExtractionError>;

    /// Resolves `raw` against this service's factories.
    fn resolve(&self, raw: &str) -> Option<ResolvedLink> {
        self.link_handler_factories()
            .into_iter()
            .find_map(|factory| {
                factory.from_url(raw).ok().map(|handler| ResolvedLink {
                    service_id: self.service_id(),
                    link_type: factory.link_type(),
                    handler,
                })
            })
    }
}

static BUILTIN_SERVICES: LazyLock<ServiceRegistry> = LazyLock::new(build_default_registry);

/// The process-wide registry of built-in services.
#[must_use]
pub fn services() -> &'static ServiceRegistry {
    &BUILTIN_SERVICES
}

/// Builds a registry with every built-in service, in disambiguation order.
#[must_use]
pub fn build_default_registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register(Box::new(YoutubeService::new()));
    registry.register(Box::new(MediaCccService::new()));
    registry
}
