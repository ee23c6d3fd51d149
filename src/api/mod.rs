//! # Resource Retrieval
//!
//! The `ApiClient` trait is the only way the router reaches the network.
//! `HttpApiClient` talks to the real API; tests swap in scripted clients.

pub mod client;

use std::fmt;

use async_trait::async_trait;

use crate::core::types::Update;

pub use client::HttpApiClient;

/// Errors that can occur while fetching a resource.
#[derive(Debug)]
pub enum ApiError {
    /// Client misconfigured (bad base URL, invalid token header).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response, including 404 for unknown updates.
    Api { status: u16, message: String },
    /// Failed to parse the response body.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Returns the name of the client, used in log lines.
    fn name(&self) -> &str;

    /// Fetches a single update by its project and update params.
    async fn fetch_update(
        &self,
        project_param: &str,
        update_param: &str,
    ) -> Result<Update, ApiError>;
}
