//! Service registry with ordered URL resolution.
//!
//! The [`ServiceRegistry`] owns every registered [`StreamingService`] and
//! decides which one handles a URL.

use tracing::{debug, info, warn};

use super::{ResolvedLink, ServiceId, StreamingService};
use crate::channel::{ChannelExtractor, ChannelTab, ChannelTabExtractor};
use crate::error::ExtractionError;
use crate::extractor::ExtractorContext;
use crate::link_handler::LinkType;

/// An ordered collection of services.
///
/// Resolution tries services in registration order and, within a service, its
/// link handler factories in the order it lists them. The first match wins, so
/// registration order is the disambiguation priority.
pub struct ServiceRegistry {
    services: Vec<Box<dyn StreamingService>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
        }
    }

    /// Registers a service. A second service with an already registered id
    /// is ignored.
    #[tracing::instrument(skip(self, service), fields(service_name))]
    pub fn register(&mut self, service: Box<dyn StreamingService>) {
        tracing::Span::current().record("service_name", service.name());
        if self.service(service.service_id()).is_some() {
            warn!(
                service_id = %service.service_id(),
                name = service.name(),
                "Service id already registered; ignoring"
            );
            return;
        }
        debug!(
            service_id = %service.service_id(),
            name = service.name(),
            "Registering service"
        );
        self.services.push(service);
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Services in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn StreamingService> {
        self.services.iter().map(AsRef::as_ref)
    }

    /// Looks up a service by id.
    #[must_use]
    pub fn service(&self, id: ServiceId) -> Option<&dyn StreamingService> {
        self.iter().find(|service| service.service_id() == id)
    }

    /// Finds the service and factory that own `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::ExtractionNotSupported`] when no registered
    /// service recognizes the URL.
    #[tracing::instrument(skip(self))]
    pub fn resolve_url(&self, raw: &str) -> Result<ResolvedLink, ExtractionError> {
        for service in self.iter() {
            if let Some(link) = service.resolve(raw) {
                info!(
                    service = service.name(),
                    link_type = link.link_type.as_str(),
                    id = link.handler.id(),
                    "URL resolved"
                );
                return Ok(link);
            }
        }
        debug!("No service recognized URL");
        Err(ExtractionError::not_supported(raw))
    }

    /// Resolves `raw` and builds the owning service's channel extractor.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::ExtractionNotSupported`] when no service
    /// recognizes the URL or it does not point at a channel.
    pub fn channel_extractor(
        &self,
        raw: &str,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelExtractor>, ExtractionError> {
        let (service, link) = self.resolve_channel(raw)?;
        service.channel_extractor(link.handler, ctx)
    }

    /// Resolves `raw` and builds a single tab extractor for it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::ExtractionNotSupported`] when no service
    /// recognizes the URL, it is not a channel, or the service lacks `tab`.
    pub fn channel_tab_extractor(
        &self,
        raw: &str,
        tab: ChannelTab,
        ctx: &ExtractorContext,
    ) -> Result<Box<dyn ChannelTabExtractor>, ExtractionError> {
        let (service, link) = self.resolve_channel(raw)?;
        service.channel_tab_extractor(link.handler, tab, ctx)
    }

    fn resolve_channel(
        &self,
        raw: &str,
    ) -> Result<(&dyn StreamingService, ResolvedLink), ExtractionError> {
        let link = self.resolve_url(raw)?;
        if link.link_type != LinkType::Channel {
            return Err(ExtractionError::not_supported(raw));
        }
        let service = self
            .service(link.service_id)
            .ok_or_else(|| ExtractionError::not_supported(raw))?;
        Ok((service, link))
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|s| (s.service_id(), s.name().to_string())))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::link_handler::{LinkHandler, LinkHandlerFactory};
    use url::Url;

    /// Accepts any URL on `host` and uses the first path segment as id.
    struct HostLinks {
        host: &'static str,
    }

    impl LinkHandlerFactory for HostLinks {
        fn link_type(&self) -> LinkType {
            LinkType::Channel
        }

        fn id_from_url(&self, url: &Url) -> Result<String, ExtractionError> {
            if url.host_str() != Some(self.host) {
                return Err(ExtractionError::parsing(url.as_str(), "wrong host"));
            }
            url.path_segments()
                .and_then(|mut s| s.next())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ExtractionError::parsing(url.as_str(), "no id"))
        }

        fn url_from_id(&self, id: &str) -> Result<String, ExtractionError> {
            Ok(format!("https://{}/{id}", self.host))
        }
    }

    struct StubService {
        id: ServiceId,
        name: &'static str,
        links: HostLinks,
    }

    impl StreamingService for StubService {
        fn service_id(&self) -> ServiceId {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }

        fn link_handler_factories(&self) -> Vec<&dyn LinkHandlerFactory> {
            vec![&self.links]
        }

        fn channel_extractor(
            &self,
            _handler: LinkHandler,
            _ctx: &ExtractorContext,
        ) -> Result<Box<dyn ChannelExtractor>, ExtractionError> {
            Err(ExtractionError::not_supported("stub"))
        }

        fn channel_tab_extractor(
            &self,
            _handler: LinkHandler,
            _tab: ChannelTab,
            _ctx: &ExtractorContext,
        ) -> Result<Box<dyn ChannelTabExtractor>, ExtractionError> {
            Err(ExtractionError::not_supported("stub"))
        }
    }

    fn stub(id: u32, name: &'static str, host: &'static str) -> Box<dyn StreamingService> {
        Box::new(StubService {
            id: ServiceId::new(id),
            name,
            links: HostLinks { host },
        })
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = ServiceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.service_count(), 0);
    }

    #[test]
    fn test_registry_first_registered_match_wins() {
        let mut registry = ServiceRegistry::new();
        registry.register(stub(10, "first", "shared.example"));
        registry.register(stub(11, "second", "shared.example"));

        let link = registry.resolve_url("https://shared.example/abc").unwrap();
        assert_eq!(link.service_id, ServiceId::new(10));
        assert_eq!(link.handler.id(), "abc");
    }

    #[test]
    fn test_registry_unmatched_url_not_supported() {
        let mut registry = ServiceRegistry::new();
        registry.register(stub(10, "first", "a.example"));
        let err = registry.resolve_url("https://b.example/x").unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionNotSupported { .. }));
    }

    #[test]
    fn test_registry_ignores_duplicate_id() {
        let mut registry = ServiceRegistry::new();
        registry.register(stub(10, "first", "a.example"));
        registry.register(stub(10, "again", "b.example"));
        assert_eq!(registry.service_count(), 1);
        assert_eq!(registry.service(ServiceId::new(10)).unwrap().name(), "first");
    }
}
