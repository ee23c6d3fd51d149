//! # Telemetry
//!
//! Analytics events the router reports. The transport is someone else's
//! problem; `LogTracker` writes events to the log, `NoopTracker` drops them.

use log::info;

use crate::core::types::Project;

pub const VIEWED_UPDATES_EVENT: &str = "Viewed Updates";

pub trait Tracker: Send + Sync {
    /// The user opened the updates list of `project`.
    fn track_viewed_updates(&self, project: &Project);
}

pub struct LogTracker;

impl Tracker for LogTracker {
    fn track_viewed_updates(&self, project: &Project) {
        info!(
            "telemetry event=\"{}\" project_id={}",
            VIEWED_UPDATES_EVENT, project.id
        );
    }
}

pub struct NoopTracker;

impl Tracker for NoopTracker {
    fn track_viewed_updates(&self, _project: &Project) {}
}
