//! Domain layer types for the perch thread client core.
//!
//! This module contains the core domain types used throughout the crate:
//! messages, threads, labels, views, and their identifiers.

mod label;
mod message;
mod thread;
mod types;
mod view;

pub use label::{system_labels, Label};
pub use message::{Address, Attachment, Message};
pub use thread::Thread;
pub use types::{LabelId, MessageId, ThreadId, ViewId};
pub use view::{managed_label_set, View};
