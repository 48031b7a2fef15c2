//! Pipe Extractor Library
//!
//! This library extracts channels, playlists and streams from independent web
//! services and exposes them through one uniform data model, whatever the
//! source's response shape, pagination scheme or error convention.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`link_handler`] - URL → canonical (id, url) resolution, no network I/O
//! - [`extractor`] - Fetch-once extractor lifecycle and the paginated list protocol
//! - [`info_item`] - Uniform item model and the fault-tolerant collector
//! - [`channel`] - Composite channel extractors exposing independently paginated tabs
//! - [`service`] - Streaming service contract and the process-wide registry
//! - [`services`] - Per-service field mapping (YouTube, media.ccc.de)
//! - [`transport`] - HTTP transport seam and its reqwest implementation
//! - [`config`] - File-backed configuration for transports and localization
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pipe_extractor::{ExtractorContext, ReqwestTransport, services};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ExtractorContext::new(Arc::new(ReqwestTransport::new()?));
//! let mut channel = services()
//!     .channel_extractor("https://media.ccc.de/c/36c3", &ctx)?;
//! channel.fetch_page().await?;
//! println!("{}", channel.name()?);
//!
//! for mut tab in channel.tabs()? {
//!     tab.fetch_page().await?;
//!     let page = tab.initial_page()?;
//!     println!("{}: {} item(s)", tab.tab(), page.items().len());
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channel;
pub mod config;
pub mod error;
pub mod extractor;
pub mod info_item;
pub mod link_handler;
pub mod localization;
pub mod service;
pub mod services;
pub mod transport;

// Re-export commonly used types
pub use channel::{ChannelExtractor, ChannelTab, ChannelTabExtractor, TabContent};
pub use config::{ConfigError, ExtractorConfig, LoadedConfig, load_default_config};
pub use error::ExtractionError;
pub use extractor::{
    ContinuationToken, Extractor, ExtractorContext, InfoItemsPage, ListExtractor, PageState,
};
pub use info_item::{
    CommitOutcome, InfoItem, InfoItemsCollector, InfoType, ItemError, ItemSource, SkipReason,
    StreamType,
};
pub use link_handler::{LinkHandler, LinkHandlerFactory, LinkType};
pub use localization::Localization;
pub use service::{ResolvedLink, ServiceId, ServiceRegistry, StreamingService, services};
pub use transport::{ReqwestTransport, Response, Transport};
