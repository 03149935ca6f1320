//! Thread list store: the in-memory cache for the active view.
//!
//! Holds the fetched thread collection for exactly one view/query at a
//! time and exposes optimistic mutation operations. Every mutation edits
//! the cache synchronously, then issues the remote call; a failed remote
//! call is logged and the optimistic state stands. Correctness is restored
//! by the next fetch, not by compensating the failed mutation.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::bridge::{Bridge, BridgeError};
use crate::domain::{system_labels, LabelId, MessageId, Thread, ThreadId};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote fetch failed; the previous cache is untouched.
    #[error("fetch failed: {0}")]
    Fetch(#[from] BridgeError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

struct StoreState {
    query: String,
    threads: Vec<Thread>,
    generation: u64,
}

/// In-memory cache of fetched threads for the active view.
///
/// Single-writer by design: one view's controller owns the store, and
/// switching views re-points it (bumping the generation counter) rather
/// than sharing cache contents across views.
pub struct ThreadListStore {
    bridge: Arc<dyn Bridge>,
    state: Mutex<StoreState>,
}

impl ThreadListStore {
    /// Creates a store for the given query with an empty cache.
    pub fn new(bridge: Arc<dyn Bridge>, query: impl Into<String>) -> Self {
        Self {
            bridge,
            state: Mutex::new(StoreState {
                query: query.into(),
                threads: Vec::new(),
                generation: 0,
            }),
        }
    }

    /// The active query.
    pub fn query(&self) -> String {
        self.state.lock().unwrap().query.clone()
    }

    /// The current view generation.
    ///
    /// Incremented on every query switch; a delayed timer that captured an
    /// older generation must treat its work as stale.
    pub fn generation(&self) -> u64 {
        self.state.lock().unwrap().generation
    }

    /// Replaces the active query and bumps the generation counter. The
    /// previous cache remains visible until the next fetch lands.
    pub fn switch_query(&self, query: impl Into<String>) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.query = query.into();
        state.generation += 1;
        state.generation
    }

    /// Snapshot of the cached threads.
    pub fn threads(&self) -> Vec<Thread> {
        self.state.lock().unwrap().threads.clone()
    }

    /// Looks up a cached thread by id.
    pub fn thread(&self, id: &ThreadId) -> Option<Thread> {
        self.state
            .lock()
            .unwrap()
            .threads
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    /// Number of cached threads with unread messages.
    pub fn unread_count(&self) -> u32 {
        self.state
            .lock()
            .unwrap()
            .threads
            .iter()
            .filter(|t| t.has_unread())
            .count() as u32
    }

    /// Fetches the active query and replaces the cache with the result.
    ///
    /// Concurrent fetches are not coalesced; the most recently completed
    /// one overwrites the cache. A failure leaves the previous cache
    /// untouched and is reported to the caller as non-fatal.
    pub async fn fetch(&self, limit: u32) -> StoreResult<usize> {
        let query = self.query();
        match self.bridge.fetch_threads(&query, limit).await {
            Ok(threads) => {
                let count = threads.len();
                let mut state = self.state.lock().unwrap();
                state.threads = threads;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(query = %query, "thread fetch failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Archives a thread: removes it from the cache immediately, then
    /// issues the remote call. No rollback on failure; a re-fetch will
    /// eventually reconcile.
    pub async fn archive(&self, id: &ThreadId) {
        {
            let mut state = self.state.lock().unwrap();
            state.threads.retain(|t| &t.id != id);
        }
        if let Err(e) = self.bridge.archive_thread(id).await {
            tracing::warn!(thread_id = %id, "remote archive failed: {e}");
        }
    }

    /// Adds and/or removes a label on a cached thread (remove before add,
    /// then dedupe), then issues the remote call. The optimistic cache
    /// state is not rolled back on failure.
    pub async fn modify_labels(
        &self,
        id: &ThreadId,
        add: Option<&LabelId>,
        remove: Option<&LabelId>,
    ) {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(thread) = state.threads.iter_mut().find(|t| &t.id == id) {
                if let Some(label) = remove {
                    thread.labels.retain(|l| l != label);
                    for msg in &mut thread.messages {
                        msg.labels.retain(|l| l != label);
                    }
                }
                if let Some(label) = add {
                    if !thread.labels.contains(label) {
                        thread.labels.push(label.clone());
                    }
                    for msg in &mut thread.messages {
                        if !msg.labels.contains(label) {
                            msg.labels.push(label.clone());
                        }
                    }
                }
            }
        }
        if let Err(e) = self.bridge.modify_labels(id, add, remove).await {
            tracing::warn!(thread_id = %id, "remote label modify failed: {e}");
        }
    }

    /// Clears the unread flag on a thread and all of its messages, removes
    /// the `UNREAD` label, then issues the remote call.
    pub async fn mark_read(&self, id: &ThreadId) {
        let unread = system_labels::unread();
        {
            let mut state = self.state.lock().unwrap();
            if let Some(thread) = state.threads.iter_mut().find(|t| &t.id == id) {
                thread.labels.retain(|l| l != &unread);
                for msg in &mut thread.messages {
                    msg.is_read = true;
                    msg.labels.retain(|l| l != &unread);
                }
            }
        }
        if let Err(e) = self.bridge.mark_as_read(id).await {
            tracing::warn!(thread_id = %id, "remote mark-read failed: {e}");
        }
    }

    /// Asks the host to download an attachment. Best-effort; failures are
    /// logged.
    pub async fn download_attachment(
        &self,
        message_id: &MessageId,
        attachment_id: &str,
        filename: &str,
    ) {
        if let Err(e) = self
            .bridge
            .download_attachment(message_id, attachment_id, filename)
            .await
        {
            tracing::warn!(message_id = %message_id, "attachment download failed: {e}");
        }
    }
}
