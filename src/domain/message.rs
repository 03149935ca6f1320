//! Message domain types.
//!
//! Represents individual email messages and related structures. A message
//! is immutable once fetched except for its label set and unread flag,
//! which the thread list store mutates optimistically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LabelId, MessageId, ThreadId};

/// An individual email message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: MessageId,
    /// Thread (conversation) this message belongs to.
    pub thread_id: ThreadId,
    /// Sender address.
    pub from: Address,
    /// Primary recipient addresses.
    pub to: Vec<Address>,
    /// Carbon copy recipient addresses.
    pub cc: Vec<Address>,
    /// Message subject line.
    pub subject: Option<String>,
    /// Plain text body content.
    pub body_text: Option<String>,
    /// HTML body content.
    pub body_html: Option<String>,
    /// Date and time the message was sent.
    pub date: DateTime<Utc>,
    /// Whether the message has been read.
    pub is_read: bool,
    /// Labels applied to this message.
    pub labels: Vec<LabelId>,
    /// File attachments.
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Returns the HTML and plain-text bodies concatenated.
    ///
    /// Content classification runs over this projection so a signal is
    /// found regardless of which body variant carries it.
    pub fn combined_body(&self) -> String {
        let mut out = String::new();
        if let Some(html) = &self.body_html {
            out.push_str(html);
        }
        if let Some(text) = &self.body_text {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(text);
        }
        out
    }
}

/// An email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address.
    pub email: String,
    /// Display name (e.g., "John Doe").
    pub name: Option<String>,
}

impl Address {
    /// Creates a new address with just an email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Creates a new address with email and display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the display representation of this address.
    ///
    /// If a name is present, returns "Name <email>", otherwise just the email.
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// A file attachment on a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier for this attachment.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// MIME content type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn make_message(id: &str) -> Message {
        Message {
            id: MessageId::from(id),
            thread_id: ThreadId::from("thread-1"),
            from: Address::with_name("sender@example.com", "Sender"),
            to: vec![Address::new("recipient@example.com")],
            cc: vec![],
            subject: Some("Test".to_string()),
            body_text: Some("plain body".to_string()),
            body_html: Some("<p>html body</p>".to_string()),
            date: Utc::now(),
            is_read: false,
            labels: vec![LabelId::from("INBOX"), LabelId::from("UNREAD")],
            attachments: vec![],
        }
    }

    #[test]
    fn address_display_with_name() {
        let addr = Address::with_name("test@example.com", "Test User");
        assert_eq!(addr.display(), "Test User <test@example.com>");
    }

    #[test]
    fn address_display_without_name() {
        let addr = Address::new("test@example.com");
        assert_eq!(addr.display(), "test@example.com");
    }

    #[test]
    fn combined_body_joins_both_variants() {
        let msg = make_message("msg-1");
        let body = msg.combined_body();
        assert!(body.contains("<p>html body</p>"));
        assert!(body.contains("plain body"));
    }

    #[test]
    fn combined_body_html_only() {
        let mut msg = make_message("msg-1");
        msg.body_text = None;
        assert_eq!(msg.combined_body(), "<p>html body</p>");
    }

    #[test]
    fn combined_body_empty() {
        let mut msg = make_message("msg-1");
        msg.body_text = None;
        msg.body_html = None;
        assert_eq!(msg.combined_body(), "");
    }

    #[test]
    fn attachment_serialization() {
        let attachment = Attachment {
            id: "att-1".to_string(),
            filename: "invite.ics".to_string(),
            content_type: "text/calendar".to_string(),
            size_bytes: 1024,
        };

        let json = serde_json::to_string(&attachment).unwrap();
        let deserialized: Attachment = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.filename, "invite.ics");
        assert_eq!(deserialized.size_bytes, 1024);
    }
}
