//! Focus guardian: keeps keyboard control out of embedded content.
//!
//! The message body renders in an embedded, partially-untrusted surface
//! that may seize input focus asynchronously (for example when its content
//! finishes loading). Shortcuts stop working the moment that happens, so a
//! low-frequency poll plus an event-driven check on host-window blur
//! force-blurs the surface whenever it holds focus. This is a best-effort
//! correction loop: a shortcut can still be swallowed for up to one poll
//! interval.
//!
//! The guardian is an injectable service rather than ambient global state
//! so tests can simulate focus-steal scenarios deterministically. The host
//! installs it once for the window's lifetime.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::config::TimingConfig;

/// Where input focus currently sits, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The application chrome (list, toolbar, anywhere shortcuts work).
    Chrome,
    /// The embedded message-rendering surface.
    MessageSurface,
}

/// Host input-focus API.
pub trait FocusHost: Send + Sync {
    /// Reports the currently focused element.
    fn focused_target(&self) -> FocusTarget;

    /// Force-blurs the embedded message surface, returning focus to the
    /// chrome.
    fn blur_message_surface(&self);
}

/// Background watcher that detects and corrects illegitimate focus
/// transfer into embedded content.
pub struct FocusGuardian {
    host: Arc<dyn FocusHost>,
    blur_recheck: std::time::Duration,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl FocusGuardian {
    /// Starts the periodic poll over the given host.
    pub fn start(host: Arc<dyn FocusHost>, timing: &TimingConfig) -> Self {
        let poll_host = host.clone();
        let interval = timing.focus_poll_interval();
        let poll_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                Self::check_once(&*poll_host);
            }
        });

        Self {
            host,
            blur_recheck: timing.focus_blur_recheck(),
            poll_task: Mutex::new(Some(poll_task)),
        }
    }

    /// Single check-and-correct pass. Returns true if focus was reclaimed.
    pub fn check_once(host: &dyn FocusHost) -> bool {
        if host.focused_target() == FocusTarget::MessageSurface {
            tracing::debug!("embedded surface holds focus, blurring");
            host.blur_message_surface();
            true
        } else {
            false
        }
    }

    /// Host-window blur handler.
    ///
    /// Re-checks shortly after the blur to catch focus handed to embedded
    /// content as a delayed side effect of that content finishing its own
    /// load.
    pub fn on_window_blur(&self) {
        let host = self.host.clone();
        let delay = self.blur_recheck;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::check_once(&*host);
        });
    }

    /// Stops the poll. The host calls this when the window goes away.
    pub fn shutdown(&self) {
        if let Some(task) = self.poll_task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Drop for FocusGuardian {
    fn drop(&mut self) {
        self.shutdown();
    }
}
