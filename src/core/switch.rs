//! # Latest-Wins Switch
//!
//! Each request channel owns one `Switch`. Starting new work aborts the
//! previous task and invalidates its `Ticket`, so a superseded fetch can
//! neither finish its work nor emit a stale result if it was already past
//! its last await point.
//!
//! ```text
//! request A ──► supersede() ─► Ticket(gen 1) ─► fetch A ┐
//! request B ──► supersede() ─► Ticket(gen 2) ─► fetch B │ A aborted,
//!                                                       │ gen 1 stale
//! emit only if ticket.is_current()  ◄───────────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;

/// Proof that a piece of work is still the latest on its channel.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::Acquire) == self.issued
    }
}

#[derive(Debug, Default)]
pub struct Switch {
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
}

impl Switch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandons the in-flight task (if any) and issues a ticket for the next one.
    pub fn supersede(&mut self) -> Ticket {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        let issued = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation: Arc::clone(&self.generation),
            issued,
        }
    }

    /// Records the task started with the latest ticket.
    pub fn track(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.in_flight.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for Switch {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_ticket_invalidates_old() {
        let mut switch = Switch::new();
        let first = switch.supersede();
        assert!(first.is_current());

        let second = switch.supersede();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[tokio::test]
    async fn test_supersede_aborts_in_flight_task() {
        let mut switch = Switch::new();
        switch.supersede();
        let (tx, mut rx) = tokio::sync::oneshot::channel::<()>();
        switch.track(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(());
        }));

        switch.supersede();
        // The aborted task drops its sender without sending
        assert!(rx.try_recv().is_err());
        assert!((&mut rx).await.is_err());
    }

    #[tokio::test]
    async fn test_drop_aborts_in_flight_task() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        {
            let mut switch = Switch::new();
            switch.supersede();
            switch.track(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let _ = tx.send(());
            }));
        }
        assert!(rx.await.is_err());
    }
}
