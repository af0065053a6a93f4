//! Request description type

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody};
use crate::error::{DomainError, DomainResult};

/// Everything needed to send one HTTP request.
///
/// The path is relative to the API base URL so the same spec can be sent
/// to the public service or to a local stand-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Unique identifier for this request
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Query parameters
    #[serde(default)]
    pub query: QueryParams,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a request with no query, headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: Headers::new(),
            body: RequestBody::none(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Sets a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(Header::new(name, value));
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Checks that the body agrees with the method.
    ///
    /// # Errors
    ///
    /// Returns an error if a GET or DELETE request carries a body.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.method.has_body() && !self.body.is_none() {
            return Err(DomainError::InvalidBody(format!(
                "{} requests must not carry a body",
                self.method
            )));
        }
        Ok(())
    }

    /// Resolves the full URL against `base`, appending query parameters.
    ///
    /// The base path is preserved: `https://host/api` + `/users` yields
    /// `https://host/api/users`. Path segments are pushed onto the base path,
    /// so a query already on `base` stays in the query and any fragment is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry a path.
    pub fn full_url(&self, base: &Url) -> DomainResult<Url> {
        let mut url = base.clone();
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| DomainError::InvalidUrl(format!("cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(self.path.split('/').filter(|s| !s.is_empty()));

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }
}
