//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::api::{ApiClient, ApiError};
use crate::core::types::{NavigationRequest, Project, Update};
use crate::telemetry::Tracker;

enum Scripted {
    Ready(Result<Update, ApiError>),
    Gated(oneshot::Receiver<Result<Update, ApiError>>),
}

/// An `ApiClient` that replays scripted responses, keyed by update param.
///
/// Unscripted params answer 404. Gated responses resolve when the test
/// sends on the returned sender.
pub struct ScriptedClient {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: watch::Sender<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        let (calls, _rx) = watch::channel(Vec::new());
        Self {
            responses: Mutex::new(HashMap::new()),
            calls,
        }
    }

    fn push(&self, update_param: &str, scripted: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(update_param.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub fn respond_ok(&self, update_param: &str) {
        self.push(
            update_param,
            Scripted::Ready(Ok(Update::with_id(update_param))),
        );
    }

    pub fn respond_err(&self, update_param: &str, err: ApiError) {
        self.push(update_param, Scripted::Ready(Err(err)));
    }

    pub fn gate(&self, update_param: &str) -> oneshot::Sender<Result<Update, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.push(update_param, Scripted::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }

    /// Resolves once at least `count` fetches have started.
    ///
    /// Panics after two seconds so a missed fetch fails the test.
    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.calls.subscribe();
        tokio::time::timeout(
            Duration::from_secs(2),
            rx.wait_for(|calls| calls.len() >= count),
        )
        .await
        .unwrap_or_else(|_| panic!("expected {count} fetches, saw {:?}", self.calls()))
        .unwrap();
    }
}

#[async_trait]
impl ApiClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_update(
        &self,
        project_param: &str,
        update_param: &str,
    ) -> Result<Update, ApiError> {
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(update_param)
            .and_then(VecDeque::pop_front);
        self.calls.send_modify(|calls| {
            calls.push((project_param.to_string(), update_param.to_string()))
        });

        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("gate dropped".into()))),
            None => Err(ApiError::Api {
                status: 404,
                message: format!("no script for update {update_param}"),
            }),
        }
    }
}

/// Records every telemetry event by project id.
#[derive(Default)]
pub struct RecordingTracker {
    viewed_updates: Mutex<Vec<String>>,
}

impl RecordingTracker {
    pub fn viewed_updates(&self) -> Vec<String> {
        self.viewed_updates.lock().unwrap().clone()
    }
}

impl Tracker for RecordingTracker {
    fn track_viewed_updates(&self, project: &Project) {
        self.viewed_updates.lock().unwrap().push(project.id.clone());
    }
}

pub fn test_project() -> Project {
    Project::new("42", "https://x/projects/42/updates")
}

pub fn request(raw: &str) -> NavigationRequest {
    NavigationRequest::parse(raw).unwrap()
}
