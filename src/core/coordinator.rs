//! # Navigation Coordinator
//!
//! Owns every channel of one updates session and the project cached for it.
//!
//! ```text
//! startup (sync) ─► [cache project] ──┬──► web_view_url (watch, latest value)
//!                        │           └──► Tracker::track_viewed_updates (once)
//!                        ▼
//! update request ─► classify ─► fetch ─► wait for project ─► start_update
//! comments req.  ─► classify ─► fetch ──────────────────────► start_comments
//! page url       ─► log
//! ```
//!
//! Startup is handled inline; every other input runs in its own task. The
//! two request pipelines own a
//! [`Switch`] so only the most recently started fetch may emit.
//! Dropping the coordinator tears down all tasks together.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::core::classifier::{self, Route};
use crate::core::fetcher::ResourceFetcher;
use crate::core::switch::{Switch, Ticket};
use crate::core::types::{NavigationRequest, Project, Update};
use crate::telemetry::Tracker;

pub const DEFAULT_OUTPUT_CAPACITY: usize = 16;

/// Collaborators a coordinator is built from.
#[derive(Clone)]
pub struct Environment {
    pub client: Arc<dyn ApiClient>,
    pub tracker: Arc<dyn Tracker>,
    pub output_capacity: usize,
}

impl Environment {
    pub fn new(client: Arc<dyn ApiClient>, tracker: Arc<dyn Tracker>) -> Self {
        Self {
            client,
            tracker,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
        }
    }
}

/// Consumer ends of the event outputs.
pub struct CoordinatorOutputs {
    pub start_comments: mpsc::Receiver<Update>,
    pub start_update: mpsc::Receiver<(Project, Update)>,
}

/// Write-once slot for the session's project.
///
/// Only the first `set` lands; readers wait on the watch channel until it does.
struct ProjectCell {
    tx: watch::Sender<Option<Project>>,
}

impl ProjectCell {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Returns true if this call cached the project.
    fn set(&self, project: Project) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(project);
            true
        })
    }

    fn subscribe(&self) -> watch::Receiver<Option<Project>> {
        self.tx.subscribe()
    }
}

pub struct NavigationCoordinator {
    session_id: String,
    project: ProjectCell,
    tracker: Arc<dyn Tracker>,
    url_tx: watch::Sender<Option<String>>,
    page_tx: mpsc::UnboundedSender<String>,
    comments_tx: mpsc::UnboundedSender<NavigationRequest>,
    update_tx: mpsc::UnboundedSender<NavigationRequest>,
    web_view_url: watch::Receiver<Option<String>>,
    tasks: Vec<JoinHandle<()>>,
}

impl NavigationCoordinator {
    /// Starts every pipeline. Must be called inside a tokio runtime.
    pub fn spawn(env: Environment) -> (Self, CoordinatorOutputs) {
        let session_id = uuid::Uuid::new_v4().to_string();
        let fetcher = ResourceFetcher::new(Arc::clone(&env.client));
        let capacity = env.output_capacity.max(1);

        let (page_tx, page_rx) = mpsc::unbounded_channel();
        let (comments_tx, comments_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let (url_tx, url_rx) = watch::channel(None);
        let (start_comments_tx, start_comments_rx) = mpsc::channel(capacity);
        let (start_update_tx, start_update_rx) = mpsc::channel(capacity);

        let project = ProjectCell::new();
        let project_rx = project.subscribe();

        let tasks = vec![
            tokio::spawn(run_page(session_id.clone(), page_rx)),
            tokio::spawn(run_comments(
                session_id.clone(),
                comments_rx,
                fetcher.clone(),
                start_comments_tx,
            )),
            tokio::spawn(run_updates(
                session_id.clone(),
                update_rx,
                fetcher,
                project_rx,
                start_update_tx,
            )),
        ];

        info!("Session {} started (client={})", session_id, env.client.name());

        let coordinator = Self {
            session_id,
            project,
            tracker: env.tracker,
            url_tx,
            page_tx,
            comments_tx,
            update_tx,
            web_view_url: url_rx,
            tasks,
        };
        let outputs = CoordinatorOutputs {
            start_comments: start_comments_rx,
            start_update: start_update_rx,
        };
        (coordinator, outputs)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Supplies the session's project. Only the first call has any effect.
    ///
    /// The web view URL is set and the telemetry event recorded before this
    /// returns.
    pub fn startup(&self, project: Project) {
        let url = project.updates_url.clone();
        let tracked = project.clone();
        if !self.project.set(project) {
            debug!("Session {}: project already cached, ignoring", self.session_id);
            return;
        }
        info!("Session {}: project {} cached", self.session_id, tracked.id);
        self.url_tx.send_replace(Some(url));
        self.tracker.track_viewed_updates(&tracked);
    }

    pub fn page_intercepted_url(&self, url: impl Into<String>) {
        if self.page_tx.send(url.into()).is_err() {
            warn!("Session {}: page url after shutdown", self.session_id);
        }
    }

    pub fn go_to_comments_request(&self, request: NavigationRequest) {
        if self.comments_tx.send(request).is_err() {
            warn!("Session {}: comments request after shutdown", self.session_id);
        }
    }

    pub fn go_to_update_request(&self, request: NavigationRequest) {
        if self.update_tx.send(request).is_err() {
            warn!("Session {}: update request after shutdown", self.session_id);
        }
    }

    /// Routes a raw intercepted URL to the matching input.
    pub fn intercept(&self, raw: &str) {
        match classifier::route(raw) {
            Route::Comments(request) => self.go_to_comments_request(request),
            Route::Update(request) => self.go_to_update_request(request),
            Route::PassThrough(url) => self.page_intercepted_url(url),
        }
    }

    /// Latest-value view of the embedded view URL. New subscribers see the
    /// current value right away.
    pub fn web_view_url(&self) -> watch::Receiver<Option<String>> {
        self.web_view_url.clone()
    }

    /// Tears down every pipeline, abandoning in-flight fetches.
    pub fn shutdown(mut self) {
        self.abort_all();
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for NavigationCoordinator {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Session {} shutting down", self.session_id);
        }
        self.abort_all();
    }
}

// ============================================================================
// Pipelines
// ============================================================================

async fn run_page(session_id: String, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(url) = rx.recv().await {
        debug!("Session {}: page intercepted {}", session_id, url);
    }
}

async fn run_comments(
    session_id: String,
    mut rx: mpsc::UnboundedReceiver<NavigationRequest>,
    fetcher: ResourceFetcher,
    out: mpsc::Sender<Update>,
) {
    let mut switch = Switch::new();
    while let Some(request) = rx.recv().await {
        let params = match classifier::classify(&request) {
            Ok(params) => params,
            Err(e) => {
                warn!(
                    "Session {}: ignoring comments request {}: {}",
                    session_id, request.url, e
                );
                continue;
            }
        };

        let ticket = switch.supersede();
        let fetcher = fetcher.clone();
        let out = out.clone();
        let session_id = session_id.clone();
        switch.track(tokio::spawn(async move {
            let Some(update) = fetcher.fetch(&params).await else {
                return;
            };
            emit(&session_id, "start_comments", &ticket, &out, update).await;
        }));
    }
}

async fn run_updates(
    session_id: String,
    mut rx: mpsc::UnboundedReceiver<NavigationRequest>,
    fetcher: ResourceFetcher,
    project_rx: watch::Receiver<Option<Project>>,
    out: mpsc::Sender<(Project, Update)>,
) {
    let mut switch = Switch::new();
    while let Some(request) = rx.recv().await {
        let params = match classifier::classify(&request) {
            Ok(params) => params,
            Err(e) => {
                warn!(
                    "Session {}: ignoring update request {}: {}",
                    session_id, request.url, e
                );
                continue;
            }
        };

        let ticket = switch.supersede();
        let fetcher = fetcher.clone();
        let out = out.clone();
        let session_id = session_id.clone();
        let mut project_rx = project_rx.clone();
        switch.track(tokio::spawn(async move {
            let Some(update) = fetcher.fetch(&params).await else {
                return;
            };
            // Buffered until startup has delivered the project
            let project = match project_rx.wait_for(Option::is_some).await {
                Ok(cached) => cached.clone(),
                Err(_) => return,
            };
            let Some(project) = project else {
                return;
            };
            emit(&session_id, "start_update", &ticket, &out, (project, update)).await;
        }));
    }
}

async fn emit<T>(
    session_id: &str,
    channel: &str,
    ticket: &Ticket,
    out: &mpsc::Sender<T>,
    value: T,
) {
    if !ticket.is_current() {
        debug!("Session {}: discarding stale {} result", session_id, channel);
        return;
    }
    if out.send(value).await.is_err() {
        debug!("Session {}: {} receiver dropped", session_id, channel);
    }
}
