//! Badge refresher: periodic unread-count and new-thread notification.
//!
//! A process-background timer refreshes the active store from remote
//! truth, pushes the unread count to the application badge, and raises a
//! desktop notification for threads that appeared since the previous
//! tick. The first tick only seeds the seen set, so starting up over a
//! full inbox does not fire a notification storm.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::bridge::Bridge;
use crate::config::{FetchConfig, TimingConfig};
use crate::domain::ThreadId;
use crate::services::thread_list::ThreadListStore;

/// Periodic view-count refresh timer.
pub struct BadgeRefresher {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BadgeRefresher {
    /// Starts the refresh loop over the given store.
    pub fn start(
        bridge: Arc<dyn Bridge>,
        store: Arc<ThreadListStore>,
        timing: &TimingConfig,
        fetch: &FetchConfig,
    ) -> Self {
        let interval = timing.badge_refresh_interval();
        let limit = fetch.thread_limit;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut seen: HashSet<ThreadId> = HashSet::new();
            let mut seeded = false;

            loop {
                ticker.tick().await;
                // best-effort: a failed refresh keeps the previous counts
                let _ = store.fetch(limit).await;

                if let Err(e) = bridge.set_badge(store.unread_count()).await {
                    tracing::warn!("badge update failed: {e}");
                }

                for thread in store.threads() {
                    if !seen.insert(thread.id.clone()) || !seeded {
                        continue;
                    }
                    let title = thread.subject.clone().unwrap_or_else(|| "New mail".into());
                    if let Err(e) = bridge.notify(&title, &thread.snippet).await {
                        tracing::warn!(thread_id = %thread.id, "notification failed: {e}");
                    }
                }
                seeded = true;
            }
        });

        Self {
            task: Mutex::new(Some(task)),
        }
    }

    /// Stops the refresh loop. Must be called when the owning view goes
    /// away so the timer cannot mutate a discarded cache.
    pub fn shutdown(&self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Drop for BadgeRefresher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
