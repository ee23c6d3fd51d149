//! # Resource Fetcher
//!
//! Wraps an `ApiClient` and never fails: a broken fetch is logged and
//! resolves to `None`, so one bad navigation can't take down a pipeline.

use std::sync::Arc;

use log::{debug, warn};

use crate::api::ApiClient;
use crate::core::classifier::ProjectUpdateParams;
use crate::core::types::Update;

#[derive(Clone)]
pub struct ResourceFetcher {
    client: Arc<dyn ApiClient>,
}

impl ResourceFetcher {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// One request to the client per call. No retry, no cache, no timeout.
    pub async fn fetch(&self, params: &ProjectUpdateParams) -> Option<Update> {
        debug!(
            "Fetching update {} of project {} via {}",
            params.update_param,
            params.project_param,
            self.client.name()
        );
        match self
            .client
            .fetch_update(&params.project_param, &params.update_param)
            .await
        {
            Ok(update) => Some(update),
            Err(e) => {
                warn!(
                    "Dropping update {} of project {}: {}",
                    params.update_param, params.project_param, e
                );
                None
            }
        }
    }
}
