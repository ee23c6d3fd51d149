//! # Domain Types
//!
//! The two resources the router correlates, plus the transient request shape
//! handed over by the embedding web view.
//!
//! ```text
//! Project  (primary, supplied once at startup)
//!    │
//!    └── Update  (secondary, fetched per navigation event)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// The project whose updates page is shown in the embedded view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Where the embedded view should navigate to.
    pub updates_url: String,
}

impl Project {
    pub fn new(id: impl Into<String>, updates_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            updates_url: updates_url.into(),
        }
    }
}

/// A single project update, resolved on demand.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Update {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub comments_count: Option<u32>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Update {
    /// An update carrying only its id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            sequence: None,
            title: None,
            body: None,
            comments_count: None,
            published_at: None,
        }
    }
}

/// Ids come back as JSON numbers from the API but are opaque strings here.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// An intercepted navigation inside the embedded view.
///
/// `segments` is the encoded path split on `/`. Absolute paths keep their
/// leading empty segment, so `/projects/42` becomes `["", "projects", "42"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    pub url: Url,
    pub segments: Vec<String>,
}

impl NavigationRequest {
    pub fn new(url: Url) -> Self {
        let segments = url.path().split('/').map(str::to_string).collect();
        Self { url, segments }
    }

    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw).map(Self::new)
    }
}
