//! Host bridge trait definition.
//!
//! This module defines the [`Bridge`] trait which abstracts over the host
//! shell's Gmail and desktop integration (thread fetching, label mutation,
//! calendar RSVP, notifications). The core is a pure consumer of this
//! contract; every call is asynchronous and may fail, and with the single
//! exception of RSVP failures the core treats failures as non-fatal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::domain::{Label, LabelId, MessageId, Thread, ThreadId, View};

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur during bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Authentication failed or credentials expired.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, if known.
        retry_after_secs: Option<u64>,
    },

    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request or parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Host-side error without a more specific classification.
    #[error("host error: {0}")]
    Host(String),
}

/// A calendar RSVP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpResponse {
    /// Attending.
    Accepted,
    /// Possibly attending.
    Tentative,
    /// Not attending.
    Declined,
}

impl RsvpResponse {
    /// Returns the wire name of this response.
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpResponse::Accepted => "accepted",
            RsvpResponse::Tentative => "tentative",
            RsvpResponse::Declined => "declined",
        }
    }
}

/// The host shell API consumed by the core.
///
/// Implementations live outside this crate (the desktop shell, or a test
/// double). All operations are non-blocking; none of them suspends the
/// caller beyond its own continuation.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Fetches threads matching a query, newest first.
    async fn fetch_threads(&self, query: &str, limit: u32) -> Result<Vec<Thread>>;

    /// Archives a thread (removes it from the inbox).
    async fn archive_thread(&self, id: &ThreadId) -> Result<()>;

    /// Adds and/or removes a label on a thread.
    async fn modify_labels(
        &self,
        id: &ThreadId,
        add: Option<&LabelId>,
        remove: Option<&LabelId>,
    ) -> Result<()>;

    /// Marks every message in a thread as read.
    async fn mark_as_read(&self, id: &ThreadId) -> Result<()>;

    /// Lists all labels known to the account.
    async fn list_labels(&self) -> Result<Vec<Label>>;

    /// Sends an RSVP for a calendar event.
    async fn calendar_rsvp(&self, event_id: &str, response: RsvpResponse) -> Result<()>;

    /// Downloads an attachment to the host's download location.
    async fn download_attachment(
        &self,
        message_id: &MessageId,
        attachment_id: &str,
        filename: &str,
    ) -> Result<()>;

    /// Shows a desktop notification.
    async fn notify(&self, title: &str, body: &str) -> Result<()>;

    /// Sets the application badge count.
    async fn set_badge(&self, count: u32) -> Result<()>;

    /// Returns the authenticated user's email address.
    async fn get_user_email(&self) -> Result<String>;

    /// Returns the application configuration.
    async fn get_config(&self) -> Result<AppConfig>;

    /// Returns the configured views.
    async fn list_views(&self) -> Result<Vec<View>>;
}
