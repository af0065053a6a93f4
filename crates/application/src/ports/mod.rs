//! Ports (interfaces) the application layer depends on.

mod http_client;

pub use http_client::{HttpClient, HttpClientError};
