//! Session wiring.
//!
//! A [`Session`] assembles the per-account core from a bridge handle:
//! configuration, views, the active-view store, the reconciler, and the
//! badge refresher. Switching views re-points the store (bumping its
//! generation so stale timers no-op) instead of sharing cache contents.

use std::sync::Arc;

use crate::bridge::{Bridge, BridgeError};
use crate::config::AppConfig;
use crate::domain::{managed_label_set, Label, Message, View, ViewId};
use crate::services::{BadgeRefresher, RsvpController, ThreadListStore, ViewReconciler};

/// Fallback query when no view is configured.
const DEFAULT_QUERY: &str = "label:INBOX";

/// A live session over one authenticated account.
pub struct Session {
    bridge: Arc<dyn Bridge>,
    config: AppConfig,
    views: Vec<View>,
    labels: Vec<Label>,
    user_email: String,
    store: Arc<ThreadListStore>,
    reconciler: ViewReconciler,
    badge: BadgeRefresher,
}

impl Session {
    /// Boots a session: loads config, views, and labels, then fetches the
    /// first view.
    ///
    /// Boot-time bridge failures are fatal to the session (there is
    /// nothing to present without them); the initial thread fetch is not.
    pub async fn bootstrap(bridge: Arc<dyn Bridge>) -> Result<Self, BridgeError> {
        let config = bridge.get_config().await?;
        let views = bridge.list_views().await?;
        let user_email = bridge.get_user_email().await?;
        let labels = bridge.list_labels().await?;

        for managed in managed_label_set(&views) {
            if !labels.iter().any(|l| l.id == managed) {
                tracing::warn!(label = %managed, "view references a label the account does not have");
            }
        }

        let initial_query = views
            .first()
            .map(|v| v.query.clone())
            .unwrap_or_else(|| DEFAULT_QUERY.to_string());
        let store = Arc::new(ThreadListStore::new(bridge.clone(), initial_query));
        if store.fetch(config.fetch.thread_limit).await.is_err() {
            tracing::warn!("initial thread fetch failed, starting with an empty list");
        }

        let reconciler = ViewReconciler::new(
            store.clone(),
            &views,
            config.timing.reconcile_delay(),
            config.fetch.thread_limit,
        );
        let badge = BadgeRefresher::start(
            bridge.clone(),
            store.clone(),
            &config.timing,
            &config.fetch,
        );

        tracing::info!(user = %user_email, views = views.len(), "session ready");
        Ok(Self {
            bridge,
            config,
            views,
            labels,
            user_email,
            store,
            reconciler,
            badge,
        })
    }

    /// The authenticated user's address.
    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    /// The loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The configured views.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Labels known to the account.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The active-view store.
    pub fn store(&self) -> &Arc<ThreadListStore> {
        &self.store
    }

    /// The view reconciler.
    pub fn reconciler(&self) -> &ViewReconciler {
        &self.reconciler
    }

    /// Switches to a configured view and fetches it.
    ///
    /// Pending reconcile timers from the previous view become stale
    /// through the generation bump. Unknown view ids are ignored.
    pub async fn switch_view(&self, view_id: &ViewId) {
        let Some(view) = self.views.iter().find(|v| &v.id == view_id) else {
            tracing::warn!(view_id = %view_id, "switch to unknown view ignored");
            return;
        };
        self.store.switch_query(view.query.clone());
        if self.store.fetch(self.config.fetch.thread_limit).await.is_err() {
            tracing::warn!(view_id = %view_id, "view fetch failed, previous list still shown");
        }
    }

    /// Builds an RSVP controller for a presented message, wired to the
    /// active store so an accepted invite archives out of the list.
    pub fn rsvp_controller(&self, message: &Message) -> RsvpController {
        RsvpController::new(message, self.bridge.clone(), Some(self.store.clone()))
    }

    /// Tears the session down, cancelling every per-view timer.
    pub fn teardown(&self) {
        self.reconciler.teardown();
        self.badge.shutdown();
    }
}
