//! Label domain types.
//!
//! Represents email labels (folders/tags) used for organization and view
//! membership.

use serde::{Deserialize, Serialize};

use super::LabelId;

/// An email label (folder or tag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Unique identifier for this label.
    pub id: LabelId,
    /// Display name of the label.
    pub name: String,
    /// Whether this is a system label (INBOX, UNREAD, etc.).
    pub is_system: bool,
}

/// Well-known system label IDs.
pub mod system_labels {
    use super::LabelId;

    /// Returns the inbox label ID.
    pub fn inbox() -> LabelId {
        LabelId::from("INBOX")
    }

    /// Returns the unread label ID.
    pub fn unread() -> LabelId {
        LabelId::from("UNREAD")
    }

    /// Returns the starred label ID.
    pub fn starred() -> LabelId {
        LabelId::from("STARRED")
    }

    /// Returns the trash label ID.
    pub fn trash() -> LabelId {
        LabelId::from("TRASH")
    }
}
