//! HTTP transport seam between extractors and the network.
//!
//! Extractors never talk to an HTTP client directly; they issue requests
//! through a [`Transport`], which keeps the core free of timeout, retry and
//! cancellation policy and lets tests substitute scripted responses.
//!
//! - [`Transport`] - Async trait with `get` and `post`
//! - [`Response`] - Status, body and final URL of one request
//! - [`ReqwestTransport`] - Default implementation on top of `reqwest`

mod http_client;

pub use http_client::{ReqwestTransport, TransportBuildError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExtractionError;

/// One completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
    /// Final URL after redirects.
    pub url: String,
}

impl Response {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            url: url.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Passes 2xx responses through and maps the rest onto the error taxonomy.
    ///
    /// 404 and 410 mean the service reports the content gone, which is
    /// [`ExtractionError::ContentNotAvailable`]; anything else non-2xx is
    /// [`ExtractionError::HttpStatus`].
    ///
    /// # Errors
    ///
    /// Returns the mapped error for non-2xx statuses.
    pub fn ensure_success(self) -> Result<Self, ExtractionError> {
        match self.status {
            status if (200..300).contains(&status) => Ok(self),
            404 | 410 => Err(ExtractionError::content_not_available(
                &self.url,
                &format!("service returned HTTP {}", self.status),
            )),
            status => Err(ExtractionError::http_status(&self.url, status)),
        }
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MalformedResponse`] when the body is not JSON.
    pub fn json(&self) -> Result<Value, ExtractionError> {
        serde_json::from_str(&self.body).map_err(|error| {
            ExtractionError::malformed_response(&self.url, &format!("body is not JSON: {error}"))
        })
    }
}

/// Request/response transport used by every extractor.
///
/// Implementations own timeouts, retries and cancellation; the core issues
/// exactly the requests an operation needs and propagates whatever failure
/// the transport reports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET request.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, ExtractionError>;

    /// Issues a POST request with a raw body.
    async fn post(
        &self,
        url: &str,
        body: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<Response, ExtractionError>;
}
