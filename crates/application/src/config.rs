//! Environment-backed suite configuration.
//!
//! Every setting has a default pointing at the public service, so a bare
//! `reqres-conformance` run needs no environment at all. Values that are
//! present must be non-empty and valid; invalid input fails the load
//! instead of falling back to the default.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";
/// Default credential header name.
pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";
/// Default credential value.
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment keys read by [`ConformanceConfig::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnv {
    /// API base URL.
    BaseUrl,
    /// Credential header name.
    ApiKeyHeader,
    /// Credential header value.
    ApiKey,
    /// Per-request timeout in seconds (positive integer).
    TimeoutSecs,
}

impl ConfigEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "REQRES_BASE_URL",
            Self::ApiKeyHeader => "REQRES_API_KEY_HEADER",
            Self::ApiKey => "REQRES_API_KEY",
            Self::TimeoutSecs => "REQRES_TIMEOUT_SECS",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to an empty string.
    #[error("{key} must not be empty")]
    Empty {
        /// Variable name.
        key: &'static str,
    },

    /// A variable was set but is not valid UTF-8.
    #[error("{key} must be valid UTF-8")]
    NotUnicode {
        /// Variable name.
        key: &'static str,
    },

    /// The timeout is not a positive integer.
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidTimeout {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },

    /// The base URL is not an absolute http(s) URL without query or fragment.
    #[error("{key} must be an absolute http(s) URL without query or fragment, got '{value}'")]
    InvalidBaseUrl {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Typed configuration for a conformance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceConfig {
    /// API base URL; request paths are appended to its path.
    pub base_url: Url,
    /// Credential header name.
    pub api_key_header: String,
    /// Credential header value.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConformanceConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but empty, not UTF-8, or
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(()),
        })
    }

    /// Loads configuration from a key/value map instead of the environment.
    ///
    /// # Errors
    ///
    /// Same as [`ConformanceConfig::load`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| Ok(vars.get(key).cloned()))
    }

    /// Builds a default configuration pointing at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ()>,
    {
        let read = |env: ConfigEnv| -> Result<Option<String>, ConfigError> {
            let key = env.as_str();
            match lookup(key) {
                Ok(Some(value)) if value.trim().is_empty() => Err(ConfigError::Empty { key }),
                Ok(value) => Ok(value.map(|v| v.trim().to_string())),
                Err(()) => Err(ConfigError::NotUnicode { key }),
            }
        };

        let base_url = parse_base_url(
            read(ConfigEnv::BaseUrl)?
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL),
        )?;
        let api_key_header = read(ConfigEnv::ApiKeyHeader)?
            .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());
        let api_key = read(ConfigEnv::ApiKey)?.unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let timeout = match read(ConfigEnv::TimeoutSecs)? {
            Some(value) => parse_timeout(&value)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            api_key_header,
            api_key,
            timeout,
        })
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidBaseUrl {
        key: ConfigEnv::BaseUrl.as_str(),
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https")
        || url.cannot_be_a_base()
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return Err(invalid());
    }
    Ok(url)
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            key: ConfigEnv::TimeoutSecs.as_str(),
            value: value.to_string(),
        }),
    }
}
