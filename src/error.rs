//! Error types for extraction operations.
//!
//! Every failure the library surfaces is an [`ExtractionError`], following the
//! What/Why/Fix pattern used across the project. Variants are `Clone` so an
//! extractor can memoize a failed fetch and hand the same cause back from
//! every later getter.

use thiserror::Error;

/// Errors that can occur while resolving links or extracting content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// A URL, field or item did not have the expected shape.
    ///
    /// Recoverable per item inside a collector; fatal for an extractor when it
    /// blocks a required field.
    #[error("parsing failed for '{context}': {reason}")]
    Parsing {
        /// What was being parsed (a URL, a field path, an item)
        context: String,
        /// Why parsing failed
        reason: String,
    },

    /// The response as a whole is unusable (not JSON, top-level structure missing)
    #[error(
        "malformed response from '{url}': {reason}\n  Suggestion: The service may have changed its response format"
    )]
    MalformedResponse {
        /// The URL whose response could not be used
        url: String,
        /// What was wrong with the response
        reason: String,
    },

    /// No registered service recognizes the URL
    #[error(
        "no service supports '{url}'\n  Suggestion: Check the URL or use a link from a supported service"
    )]
    ExtractionNotSupported {
        /// The URL no service matched
        url: String,
    },

    /// The service explicitly reports the content as removed, private or blocked
    #[error("content not available at '{url}': {reason}")]
    ContentNotAvailable {
        /// The URL of the unavailable content
        url: String,
        /// The service's reason, when it gives one
        reason: String,
    },

    /// The caller misused the API (empty continuation token, read before fetch)
    #[error("illegal argument: {reason}")]
    IllegalArgument {
        /// What the caller did wrong
        reason: String,
    },

    /// The transport failed before a response arrived
    #[error("network error fetching '{url}': {message}\n  Suggestion: Check network connectivity and retry")]
    Network {
        /// The URL being fetched
        url: String,
        /// The transport's description of the failure
        message: String,
    },

    /// The service answered with an unexpected HTTP status
    #[error("HTTP {status} fetching '{url}'")]
    HttpStatus {
        /// The URL being fetched
        url: String,
        /// The HTTP status code
        status: u16,
    },
}

impl ExtractionError {
    /// Creates a `Parsing` error.
    #[must_use]
    pub fn parsing(context: &str, reason: &str) -> Self {
        Self::Parsing {
            context: context.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Parsing` error for a required field that is missing.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::parsing(field, "required field is missing")
    }

    /// Creates a `MalformedResponse` error.
    #[must_use]
    pub fn malformed_response(url: &str, reason: &str) -> Self {
        Self::MalformedResponse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `ExtractionNotSupported` error.
    #[must_use]
    pub fn not_supported(url: &str) -> Self {
        Self::ExtractionNotSupported {
            url: url.to_string(),
        }
    }

    /// Creates a `ContentNotAvailable` error.
    #[must_use]
    pub fn content_not_available(url: &str, reason: &str) -> Self {
        Self::ContentNotAvailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `IllegalArgument` error.
    #[must_use]
    pub fn illegal_argument(reason: &str) -> Self {
        Self::IllegalArgument {
            reason: reason.to_string(),
        }
    }

    /// Creates the error returned when page content is read before `fetch_page`.
    #[must_use]
    pub fn not_fetched() -> Self {
        Self::illegal_argument("page content was read before fetch_page() was called")
    }

    /// Creates the error returned for an empty or absent continuation token.
    #[must_use]
    pub fn empty_token() -> Self {
        Self::illegal_argument("continuation token is empty; check next_page() before paging")
    }

    /// Creates a `Network` error.
    #[must_use]
    pub fn network(url: &str, message: &str) -> Self {
        Self::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::HttpStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Returns true for failures a collector records instead of propagating.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parsing { .. })
    }

    /// Returns true for caller misuse (empty token, read before fetch).
    #[must_use]
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, Self::IllegalArgument { .. })
    }
}
