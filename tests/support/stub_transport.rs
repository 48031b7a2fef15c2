//! In-memory transport with scripted responses and a request log.

use std::sync::Mutex;

use async_trait::async_trait;
use pipe_extractor::{ExtractionError, Response, Transport};
use serde_json::Value;

/// Answers each request with the first route whose prefix matches the URL.
///
/// Unmatched URLs fail with a network error, so a test notices any request
/// it did not script.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<(String, u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes URLs starting with `prefix` to a 200 JSON body.
    pub fn with_json(self, prefix: &str, body: &Value) -> Self {
        self.with_response(prefix, 200, &body.to_string())
    }

    /// Routes URLs starting with `prefix` to an arbitrary status and body.
    pub fn with_response(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes
            .push((prefix.to_string(), status, body.to_string()));
        self
    }

    /// Number of requests issued so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// URLs requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, url: &str) -> Result<Response, ExtractionError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .iter()
            .find(|(prefix, _, _)| url.starts_with(prefix.as_str()))
            .map(|(_, status, body)| Response::new(*status, body.clone(), url))
            .ok_or_else(|| ExtractionError::network(url, "no scripted response"))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
    ) -> Result<Response, ExtractionError> {
        self.answer(url)
    }

    async fn post(
        &self,
        url: &str,
        _body: &[u8],
        _headers: &[(&str, &str)],
    ) -> Result<Response, ExtractionError> {
        self.answer(url)
    }
}
