//! View reconciler: enforces the single-managed-label invariant.
//!
//! Every configured view backed by a `label:<NAME>` query contributes a
//! managed label, and a thread should carry at most one managed label once
//! reconciliation settles. Moving a thread between views removes every
//! other managed label, adds the target, archives the thread out of the
//! active list, and schedules a delayed remote-truth fetch to repair any
//! optimistic drift.
//!
//! The delayed fetch is modelled as a small per-reconciliation state
//! machine keyed by the store's generation counter, so a timer that fires
//! after the view switched is a no-op instead of corrupting the new view's
//! cache.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::domain::{managed_label_set, LabelId, ThreadId, View};
use crate::services::thread_list::ThreadListStore;

/// Lifecycle of a scheduled reconciliation fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    /// Timer armed, fetch not yet started.
    Scheduled,
    /// Fetch in progress.
    InFlight,
    /// Fetch completed (successfully or not).
    Settled,
    /// Superseded by a newer schedule or a view switch.
    Cancelled,
}

struct PendingReconcile {
    phase: Arc<Mutex<ReconcilePhase>>,
    handle: JoinHandle<()>,
}

/// Maps configured views onto managed labels and moves threads between
/// them.
pub struct ViewReconciler {
    store: Arc<ThreadListStore>,
    managed: Mutex<Vec<LabelId>>,
    delay: Duration,
    fetch_limit: u32,
    pending: Mutex<Option<PendingReconcile>>,
}

impl ViewReconciler {
    /// Creates a reconciler over the given store and view list.
    pub fn new(
        store: Arc<ThreadListStore>,
        views: &[View],
        delay: Duration,
        fetch_limit: u32,
    ) -> Self {
        Self {
            store,
            managed: Mutex::new(managed_label_set(views)),
            delay,
            fetch_limit,
            pending: Mutex::new(None),
        }
    }

    /// The current managed label set.
    pub fn managed_labels(&self) -> Vec<LabelId> {
        self.managed.lock().unwrap().clone()
    }

    /// Recomputes the managed label set after the view list changed.
    pub fn set_views(&self, views: &[View]) {
        *self.managed.lock().unwrap() = managed_label_set(views);
    }

    /// Moves a thread to the given managed label.
    ///
    /// If the thread already carries the label this is a toggle-off: the
    /// label is removed and nothing else happens besides the scheduled
    /// reconcile. Otherwise every other managed label is removed
    /// (fire-and-forget, order unspecified), the target is added, and the
    /// thread is archived out of the active list.
    pub async fn move_to_label(&self, id: &ThreadId, label: &LabelId) {
        let already_carries = self
            .store
            .thread(id)
            .map(|t| t.has_label(label))
            .unwrap_or(false);

        if already_carries {
            tracing::debug!(thread_id = %id, label = %label, "toggling managed label off");
            self.store.modify_labels(id, None, Some(label)).await;
            self.schedule_reconcile();
            return;
        }

        let others: Vec<LabelId> = self
            .managed_labels()
            .into_iter()
            .filter(|m| m != label)
            .collect();
        join_all(
            others
                .iter()
                .map(|m| self.store.modify_labels(id, None, Some(m))),
        )
        .await;

        self.store.modify_labels(id, Some(label), None).await;
        self.store.archive(id).await;
        self.schedule_reconcile();
    }

    /// Archives a thread out of every view ("done").
    ///
    /// A thread leaving any view must leave all of them, so every managed
    /// label is removed before the archive.
    pub async fn archive_done(&self, id: &ThreadId) {
        let managed = self.managed_labels();
        join_all(
            managed
                .iter()
                .map(|m| self.store.modify_labels(id, None, Some(m))),
        )
        .await;
        self.store.archive(id).await;
        self.schedule_reconcile();
    }

    /// Marks a thread read through the store. Exposed here so keyboard
    /// actions go through one surface.
    pub async fn mark_read(&self, id: &ThreadId) {
        self.store.mark_read(id).await;
    }

    /// Phase of the most recently scheduled reconciliation, if any.
    pub fn pending_phase(&self) -> Option<ReconcilePhase> {
        self.pending
            .lock()
            .unwrap()
            .as_ref()
            .map(|p| *p.phase.lock().unwrap())
    }

    /// Arms the delayed reconciliation fetch, superseding any previous
    /// pending one.
    pub fn schedule_reconcile(&self) {
        let phase = Arc::new(Mutex::new(ReconcilePhase::Scheduled));
        let generation = self.store.generation();
        let store = self.store.clone();
        let task_phase = phase.clone();
        let delay = self.delay;
        let limit = self.fetch_limit;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.generation() != generation {
                *task_phase.lock().unwrap() = ReconcilePhase::Cancelled;
                tracing::debug!(generation, "stale reconcile timer, skipping fetch");
                return;
            }
            *task_phase.lock().unwrap() = ReconcilePhase::InFlight;
            if let Err(e) = store.fetch(limit).await {
                tracing::warn!("reconcile fetch failed: {e}");
            }
            *task_phase.lock().unwrap() = ReconcilePhase::Settled;
        });

        let previous = self
            .pending
            .lock()
            .unwrap()
            .replace(PendingReconcile { phase, handle });
        if let Some(previous) = previous {
            cancel(previous);
        }
    }

    /// Cancels any outstanding reconciliation timer. Must be called when
    /// the owning view is torn down so a stale timer cannot mutate a
    /// discarded cache.
    pub fn teardown(&self) {
        if let Some(pending) = self.pending.lock().unwrap().take() {
            cancel(pending);
        }
    }
}

fn cancel(pending: PendingReconcile) {
    let mut phase = pending.phase.lock().unwrap();
    if matches!(*phase, ReconcilePhase::Scheduled | ReconcilePhase::InFlight) {
        *phase = ReconcilePhase::Cancelled;
        pending.handle.abort();
    }
}

impl Drop for ViewReconciler {
    fn drop(&mut self) {
        self.teardown();
    }
}
