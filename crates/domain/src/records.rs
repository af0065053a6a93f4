//! Records served by the mock API.
//!
//! These are read-only, server-owned shapes. The suite never creates or
//! mutates them; they exist to give the JSON bodies a typed view.

use serde::{Deserialize, Serialize};

/// A user record from `/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: u32,
    /// E-mail address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar image URL.
    pub avatar: String,
}

/// A colour resource record from `/unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource id.
    pub id: u32,
    /// Colour name.
    pub name: String,
    /// Year of the colour.
    pub year: u16,
    /// Hex colour, e.g. `#C74375`.
    pub color: String,
    /// Pantone reference.
    pub pantone_value: String,
}

/// Informational block attached to list and read responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Link target.
    pub url: String,
    /// Link text.
    pub text: String,
}

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub per_page: u32,
    /// Total records across all pages.
    pub total: u32,
    /// Number of pages.
    pub total_pages: u32,
    /// Records on this page; empty past the last page.
    pub data: Vec<T>,
    /// Support block.
    pub support: Support,
}

/// Single-record envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Single<T> {
    /// The record.
    pub data: T,
    /// Support block.
    pub support: Support,
}

/// Echo returned by create, update and partial update calls.
///
/// Absent and `null` fields both deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEcho {
    /// Echoed name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Echoed job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    /// Server-assigned id (create only). Reqres returns it as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation timestamp (create only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Update timestamp (update and partial update).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
