//! Application error types

use reqres_domain::DomainError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP exchange failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A scenario id was requested that the catalog does not contain.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
