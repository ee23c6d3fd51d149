//! HTTP implementation of `ApiClient` on top of reqwest.
//!
//! `GET {base_url}/v1/projects/{project_param}/updates/{update_param}`
//! returns the update as JSON. Params are inserted verbatim since they are
//! already in encoded form.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::{ApiClient, ApiError};
use crate::core::types::Update;

pub const DEFAULT_API_BASE_URL: &str = "https://api.kickstarter.com";

pub struct HttpApiClient {
    base_url: String,
    oauth_token: Option<String>,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: Option<String>, oauth_token: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            oauth_token,
            client: reqwest::Client::new(),
        }
    }

    fn update_url(&self, project_param: &str, update_param: &str) -> String {
        format!(
            "{}/v1/projects/{}/updates/{}",
            self.base_url, project_param, update_param
        )
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_update(
        &self,
        project_param: &str,
        update_param: &str,
    ) -> Result<Update, ApiError> {
        let url = self.update_url(project_param, update_param);
        info!("Fetching update: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.oauth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::Config(e.to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        debug!("Update response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Update API error: {} - {}", status, err_body);
            return Err(ApiError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str::<Update>(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
