//! Shared test doubles for the service layer.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::bridge::{Bridge, BridgeError, Result, RsvpResponse};
use crate::config::AppConfig;
use crate::domain::{
    Address, Label, LabelId, Message, MessageId, Thread, ThreadId, View, ViewId,
};

/// In-memory [`Bridge`] double that records every call and can be told to
/// fail specific operations.
pub(crate) struct MockBridge {
    /// Threads returned by `fetch_threads`.
    pub threads: Mutex<Vec<Thread>>,
    /// Per-call fetch plans (delay before responding, result), consumed in
    /// order. When empty, `threads` is returned immediately.
    pub fetch_plans: Mutex<VecDeque<(Duration, Vec<Thread>)>>,
    /// Formatted log of every bridge call, in order.
    pub calls: Mutex<Vec<String>>,
    /// Operation names that should fail with a connection error.
    pub fail: Mutex<HashSet<&'static str>>,
    /// Labels returned by `list_labels`.
    pub labels: Mutex<Vec<Label>>,
    /// Views returned by `list_views`.
    pub views: Mutex<Vec<View>>,
    /// Config returned by `get_config`.
    pub config: Mutex<AppConfig>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            threads: Mutex::new(Vec::new()),
            fetch_plans: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(HashSet::new()),
            labels: Mutex::new(Vec::new()),
            views: Mutex::new(Vec::new()),
            config: Mutex::new(AppConfig::default()),
        }
    }

    pub fn with_threads(self, threads: Vec<Thread>) -> Self {
        *self.threads.lock().unwrap() = threads;
        self
    }

    pub fn fail_op(&self, op: &'static str) {
        self.fail.lock().unwrap().insert(op);
    }

    /// Queues a fetch response that arrives only after `delay`.
    pub fn plan_fetch(&self, delay: Duration, threads: Vec<Thread>) {
        self.fetch_plans.lock().unwrap().push_back((delay, threads));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_named(&self, op: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(op))
            .collect()
    }

    fn record(&self, call: String, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail.lock().unwrap().contains(op) {
            Err(BridgeError::Connection("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Bridge for MockBridge {
    async fn fetch_threads(&self, query: &str, limit: u32) -> Result<Vec<Thread>> {
        self.record(format!("fetch_threads {query} {limit}"), "fetch_threads")?;
        let plan = self.fetch_plans.lock().unwrap().pop_front();
        if let Some((delay, threads)) = plan {
            tokio::time::sleep(delay).await;
            return Ok(threads);
        }
        Ok(self.threads.lock().unwrap().clone())
    }

    async fn archive_thread(&self, id: &ThreadId) -> Result<()> {
        self.record(format!("archive_thread {id}"), "archive_thread")
    }

    async fn modify_labels(
        &self,
        id: &ThreadId,
        add: Option<&LabelId>,
        remove: Option<&LabelId>,
    ) -> Result<()> {
        let add = add.map(|l| l.to_string()).unwrap_or_default();
        let remove = remove.map(|l| l.to_string()).unwrap_or_default();
        self.record(
            format!("modify_labels {id} +[{add}] -[{remove}]"),
            "modify_labels",
        )
    }

    async fn mark_as_read(&self, id: &ThreadId) -> Result<()> {
        self.record(format!("mark_as_read {id}"), "mark_as_read")
    }

    async fn list_labels(&self) -> Result<Vec<Label>> {
        self.record("list_labels".to_string(), "list_labels")?;
        Ok(self.labels.lock().unwrap().clone())
    }

    async fn calendar_rsvp(&self, event_id: &str, response: RsvpResponse) -> Result<()> {
        self.record(
            format!("calendar_rsvp {event_id} {}", response.as_str()),
            "calendar_rsvp",
        )
    }

    async fn download_attachment(
        &self,
        message_id: &MessageId,
        attachment_id: &str,
        filename: &str,
    ) -> Result<()> {
        self.record(
            format!("download_attachment {message_id} {attachment_id} {filename}"),
            "download_attachment",
        )
    }

    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.record(format!("notify {title} {body}"), "notify")
    }

    async fn set_badge(&self, count: u32) -> Result<()> {
        self.record(format!("set_badge {count}"), "set_badge")
    }

    async fn get_user_email(&self) -> Result<String> {
        self.record("get_user_email".to_string(), "get_user_email")?;
        Ok("me@example.com".to_string())
    }

    async fn get_config(&self) -> Result<AppConfig> {
        self.record("get_config".to_string(), "get_config")?;
        Ok(self.config.lock().unwrap().clone())
    }

    async fn list_views(&self) -> Result<Vec<View>> {
        self.record("list_views".to_string(), "list_views")?;
        Ok(self.views.lock().unwrap().clone())
    }
}

/// Builds a thread with one unread message and the given labels.
pub(crate) fn make_thread(id: &str, labels: &[&str]) -> Thread {
    let labels: Vec<LabelId> = labels.iter().map(|l| LabelId::from(*l)).collect();
    Thread {
        id: ThreadId::from(id),
        subject: Some(format!("Subject {id}")),
        snippet: "Preview...".to_string(),
        participants: vec![Address::new("alice@example.com")],
        messages: vec![Message {
            id: MessageId::from(format!("{id}-msg-1")),
            thread_id: ThreadId::from(id),
            from: Address::new("alice@example.com"),
            to: vec![Address::new("me@example.com")],
            cc: vec![],
            subject: Some(format!("Subject {id}")),
            body_text: Some("hello".to_string()),
            body_html: None,
            date: Utc::now(),
            is_read: false,
            labels: labels.clone(),
            attachments: vec![],
        }],
        labels,
    }
}

/// Builds a view backed by `label:<label>`.
pub(crate) fn make_view(id: &str, label: &str) -> View {
    View {
        id: ViewId::from(id),
        name: id.to_string(),
        query: format!("label:{label}"),
        icon: None,
        shortcut: None,
    }
}
