//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body. The suite only ever sends JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// A JSON object body
    Json(Map<String, Value>),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Creates a JSON object body from `(key, value)` pairs.
    #[must_use]
    pub fn json<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Json(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates an empty JSON object body (`{}`).
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Json(Map::new())
    }

    /// Returns whether there is no body at all.
    ///
    /// An empty JSON object still counts as a body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the JSON object, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::None => None,
            Self::Json(map) => Some(map),
        }
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json(_) => Some("application/json"),
        }
    }
}
