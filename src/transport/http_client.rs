//! Default [`Transport`] on top of `reqwest`.
//!
//! Centralizes networking defaults so every service shares the same timeout,
//! user-agent, compression and proxy behavior.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, ClientBuilder, Proxy, RequestBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::localization::Localization;

use super::{Response, Transport};

/// Errors raised while constructing the HTTP client.
#[derive(Debug, Error)]
pub enum TransportBuildError {
    /// Querying system proxy settings panicked in both builder modes
    #[error("HTTP client construction panicked while initializing networking")]
    Panicked,

    /// reqwest rejected the client configuration
    #[error("HTTP client construction failed: {0}")]
    Build(#[from] reqwest::Error),
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    accept_language: String,
}

impl ReqwestTransport {
    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] when client construction fails.
    pub fn new() -> Result<Self, TransportBuildError> {
        Self::from_config(&ExtractorConfig::default())
    }

    /// Creates a transport using timeouts, user agent and localization from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] when client construction fails.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, TransportBuildError> {
        let client = match try_build_client(config, false) {
            Ok(client) => client,
            Err(BuildClientFailure::Panic) => {
                // Some restricted sandboxes panic when querying system proxy
                // settings; env proxies still apply on the fallback builder.
                warn!("HTTP client hit system proxy panic; using env-proxy fallback builder");
                match try_build_client(config, true) {
                    Ok(client) => client,
                    Err(BuildClientFailure::Panic) => return Err(TransportBuildError::Panicked),
                    Err(BuildClientFailure::Build(error)) => return Err(error.into()),
                }
            }
            Err(BuildClientFailure::Build(error)) => return Err(error.into()),
        };

        Ok(Self {
            client,
            accept_language: config.localization.accept_language(),
        })
    }

    /// Replaces the `Accept-Language` sent when a request does not set its own.
    #[must_use]
    pub fn with_localization(mut self, localization: &Localization) -> Self {
        self.accept_language = localization.accept_language();
        self
    }

    async fn send(
        &self,
        url: &str,
        mut request: RequestBuilder,
        headers: &[(&str, &str)],
    ) -> Result<Response, ExtractionError> {
        let mut has_accept_language = false;
        for (name, value) in headers {
            has_accept_language |= name.eq_ignore_ascii_case(ACCEPT_LANGUAGE.as_str());
            request = request.header(*name, *value);
        }
        if !has_accept_language {
            request = request.header(ACCEPT_LANGUAGE, &self.accept_language);
        }

        let response = request.send().await.map_err(|error| {
            let message = if error.is_timeout() {
                "request timed out".to_string()
            } else {
                error.to_string()
            };
            ExtractionError::network(url, &message)
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|error| ExtractionError::network(url, &format!("body read failed: {error}")))?;

        debug!(url, status, body_len = body.len(), "Transport response");
        Ok(Response::new(status, body, final_url))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, headers), fields(method = "GET"))]
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, ExtractionError> {
        self.send(url, self.client.get(url), headers).await
    }

    #[tracing::instrument(skip(self, body, headers), fields(method = "POST", body_len = body.len()))]
    async fn post(
        &self,
        url: &str,
        body: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<Response, ExtractionError> {
        self.send(url, self.client.post(url).body(body.to_vec()), headers)
            .await
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    config: &ExtractorConfig,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(|| {
        let mut builder = base_builder(config);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(config: &ExtractorConfig) -> ClientBuilder {
    let mut default_headers = reqwest::header::HeaderMap::new();
    if let Ok(value) = reqwest::header::HeaderValue::from_str(&config.user_agent) {
        default_headers.insert(USER_AGENT, value);
    }

    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.read_timeout_secs))
        .default_headers(default_headers)
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    match scheme {
        "https" => find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        "http" => find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        _ => None,
    }
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
