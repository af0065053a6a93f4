//! HTTP Client port

use async_trait::async_trait;
use reqres_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;
use url::Url;

/// Transport-level failures. These are not assertion failures: the
/// exchange never produced a response to assert on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body does not fit the method.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Host name resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// Reading the response body failed.
    #[error("failed to read body: {0}")]
    BodyRead(String),

    /// Anything else reported by the HTTP stack.
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, so the runner can
/// be driven by reqwest in production and by anything else in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `request` to `base_url` joined with the request path and returns
    /// the full response, including its measured duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other HTTP-related problems. HTTP error statuses are
    /// returned as regular responses.
    async fn execute(
        &self,
        base_url: &Url,
        request: &RequestSpec,
    ) -> Result<ResponseSpec, HttpClientError>;
}
