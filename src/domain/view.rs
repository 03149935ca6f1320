//! View domain types.
//!
//! A view is a named, query-defined subset of threads (Inbox, Pending,
//! Todo, custom). Views are configuration data: loaded once, read-only to
//! the core, mutated only by an external settings collaborator.
//!
//! The core recognizes exactly one query construct, `label:<NAME>`. A view
//! whose query carries one names a *managed* label, and a thread should
//! hold at most one managed label at a time once reconciliation settles.

use serde::{Deserialize, Serialize};

use super::{LabelId, ViewId};

/// A configured thread view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    /// Unique identifier for this view.
    pub id: ViewId,
    /// Display name shown in navigation.
    pub name: String,
    /// Search query defining membership, e.g. `label:INBOX`.
    pub query: String,
    /// Icon name for UI display.
    pub icon: Option<String>,
    /// Keyboard shortcut bound to this view.
    pub shortcut: Option<char>,
}

impl View {
    /// Returns the label this view is backed by, if its query contains a
    /// `label:<NAME>` token.
    ///
    /// Only the first `label:` token is recognized; the rest of the query
    /// is opaque to the core.
    pub fn managed_label(&self) -> Option<LabelId> {
        self.query.split_whitespace().find_map(|token| {
            let name = token.strip_prefix("label:")?;
            if name.is_empty() {
                None
            } else {
                Some(LabelId::from(name))
            }
        })
    }
}

/// Derives the managed label set from a list of configured views.
///
/// Order follows the view list; duplicates are dropped. Recomputed
/// whenever the view list changes.
pub fn managed_label_set(views: &[View]) -> Vec<LabelId> {
    let mut labels: Vec<LabelId> = Vec::new();
    for view in views {
        if let Some(label) = view.managed_label() {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }
    labels
}
