//! Thread domain types.
//!
//! Represents email threads (conversations) which group related messages.
//! Threads own their messages outright; the thread list store is the only
//! writer once a thread has been fetched.

use serde::{Deserialize, Serialize};

use super::{Address, LabelId, Message, ThreadId};

/// A complete email thread with all messages, ordered oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Unique identifier for this thread.
    pub id: ThreadId,
    /// Thread subject (from first message).
    pub subject: Option<String>,
    /// Short preview of the latest message.
    pub snippet: String,
    /// All participants in the thread.
    pub participants: Vec<Address>,
    /// All messages in the thread, oldest first.
    pub messages: Vec<Message>,
    /// Aggregate labels applied to this thread.
    pub labels: Vec<LabelId>,
}

impl Thread {
    /// Returns true if any message in the thread is unread.
    pub fn has_unread(&self) -> bool {
        self.messages.iter().any(|m| !m.is_read)
    }

    /// Returns true if the thread carries the given label.
    pub fn has_label(&self, label: &LabelId) -> bool {
        self.labels.contains(label)
    }

    /// Returns the newest message in the thread, if any.
    pub fn newest_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
