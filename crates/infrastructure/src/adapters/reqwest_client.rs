//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the conformance suite.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqres_application::ports::{HttpClient, HttpClientError};
use reqres_domain::{
    request::{HttpMethod, RequestBody, RequestSpec},
    response::{ResponseSpec, millis},
};
use reqwest::{Client, Method};
use url::Url;

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. Requests are sent once; there is no retry.
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with the given per-request timeout.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "reqres-conformance/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("reqres-conformance/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Attaches the request body. `json` also sets the content type.
    fn build_body(builder: reqwest::RequestBuilder, body: &RequestBody) -> reqwest::RequestBuilder {
        match body {
            RequestBody::None => builder,
            RequestBody::Json(map) => builder.json(map),
        }
    }

    fn timeout_ms(&self) -> u64 {
        millis(self.timeout)
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::BodyRead(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

/// Joins an error with its sources; reqwest keeps the OS reason in the chain.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        base_url: &Url,
        request: &RequestSpec,
    ) -> Result<ResponseSpec, HttpClientError> {
        request
            .validate()
            .map_err(|e| HttpClientError::InvalidBody(e.to_string()))?;
        let url = request
            .full_url(base_url)
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
        let timeout_ms = self.timeout_ms();

        tracing::debug!(method = %request.method, %url, "sending request");

        // Start timing
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(self.timeout);

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        builder = Self::build_body(builder, &request.body);

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::BodyRead(e.to_string()))?;

        // Body fully read: this is the elapsed time the delay scenario checks.
        let duration = start.elapsed();

        tracing::debug!(status, elapsed_ms = duration.as_millis(), "response received");

        Ok(ResponseSpec::new(status, headers, &body, duration))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let client = Client::new();
        let builder = client.post("https://example.com/api/users");
        let body = RequestBody::json([("name", "morpheus")]);
        let request = ReqwestHttpClient::build_body(builder, &body).build().unwrap();

        assert_eq!(
            request
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(br#"{"name":"morpheus"}"#.as_slice())
        );
    }

    #[test]
    fn test_empty_object_body_is_sent() {
        let client = Client::new();
        let builder = client.patch("https://example.com/api/users/2");
        let request = ReqwestHttpClient::build_body(builder, &RequestBody::empty_object())
            .build()
            .unwrap();
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(b"{}".as_slice())
        );
    }

    #[tokio::test]
    async fn test_body_on_get_is_rejected_before_sending() {
        let client = ReqwestHttpClient::new(Duration::from_secs(1)).unwrap();
        let base = Url::parse("http://127.0.0.1:9/api").unwrap();
        let request = RequestSpec::get("/users").with_body(RequestBody::empty_object());

        let err = client.execute(&base, &request).await.unwrap_err();
        assert!(matches!(err, HttpClientError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_connection_error_is_transport_error() {
        let client = ReqwestHttpClient::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) is closed on loopback in test environments.
        let base = Url::parse("http://127.0.0.1:9/api").unwrap();
        let result = client.execute(&base, &RequestSpec::get("/users")).await;

        assert!(matches!(
            result,
            Err(HttpClientError::ConnectionRefused { .. }
                | HttpClientError::ConnectionFailed(_)
                | HttpClientError::Timeout { .. })
        ));
    }
}
