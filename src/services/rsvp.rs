//! RSVP controller: per-message state machine for calendar invitations.
//!
//! Construction runs invite classification; a controller for a non-invite
//! message is inert. State is scoped to a single presentation instance and
//! is never persisted; the remote calendar system stays the source of
//! truth, so reselecting the message starts from `None` again.
//!
//! Transitions are a pure function from state and event to the next state
//! plus any required side effect, so the machine is unit-testable without
//! a rendering surface; the async controller merely drives it through the
//! bridge.

use std::sync::{Arc, Mutex};

use crate::bridge::{Bridge, RsvpResponse};
use crate::classify::{classify, InviteClassification};
use crate::domain::{Message, ThreadId};
use crate::services::thread_list::ThreadListStore;

/// RSVP state for one invite presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpState {
    /// No response chosen or in progress.
    None,
    /// Remote RSVP call in flight.
    Loading,
    /// Responded: attending.
    Accepted,
    /// Responded: possibly attending.
    Tentative,
    /// Responded: not attending.
    Declined,
}

impl RsvpState {
    fn from_response(response: RsvpResponse) -> Self {
        match response {
            RsvpResponse::Accepted => RsvpState::Accepted,
            RsvpResponse::Tentative => RsvpState::Tentative,
            RsvpResponse::Declined => RsvpState::Declined,
        }
    }

    /// Whether this is a terminal (responded) state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RsvpState::Accepted | RsvpState::Tentative | RsvpState::Declined
        )
    }
}

/// An input to the RSVP state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpEvent {
    /// User chose a response; `has_event_id` reflects classification.
    Respond {
        /// The chosen response.
        response: RsvpResponse,
        /// Whether an event id is available to send.
        has_event_id: bool,
    },
    /// The remote RSVP call succeeded.
    RemoteOk(RsvpResponse),
    /// The remote RSVP call failed.
    RemoteErr(String),
    /// User explicitly asked to change their response.
    Reset,
}

/// A side effect the driver must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpEffect {
    /// Issue the remote RSVP call.
    CallRemote(RsvpResponse),
    /// Archive the hosting thread (best-effort).
    ArchiveThread,
}

/// Outcome of applying an event to a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state after the event.
    pub next: RsvpState,
    /// Side effect to perform, if any.
    pub effect: Option<RsvpEffect>,
    /// Error message to surface; `None` clears any previous error.
    pub error: Option<String>,
}

/// Applies an event to a state. Pure; unknown combinations are no-ops.
pub fn transition(state: RsvpState, event: RsvpEvent) -> Transition {
    match (state, event) {
        (
            RsvpState::None,
            RsvpEvent::Respond {
                has_event_id: false,
                ..
            },
        ) => Transition {
            next: RsvpState::None,
            effect: None,
            error: Some(
                "Can't RSVP: no event reference was found in this invitation".to_string(),
            ),
        },
        (
            RsvpState::None,
            RsvpEvent::Respond {
                response,
                has_event_id: true,
            },
        ) => Transition {
            next: RsvpState::Loading,
            effect: Some(RsvpEffect::CallRemote(response)),
            error: None,
        },
        (RsvpState::Loading, RsvpEvent::RemoteOk(response)) => Transition {
            next: RsvpState::from_response(response),
            effect: Some(RsvpEffect::ArchiveThread),
            error: None,
        },
        (RsvpState::Loading, RsvpEvent::RemoteErr(message)) => Transition {
            next: RsvpState::None,
            effect: None,
            error: Some(message),
        },
        (state, RsvpEvent::Reset) if state.is_terminal() => Transition {
            next: RsvpState::None,
            effect: None,
            error: None,
        },
        (state, _) => Transition {
            next: state,
            effect: None,
            error: None,
        },
    }
}

/// Drives the RSVP state machine for one presented message.
pub struct RsvpController {
    bridge: Arc<dyn Bridge>,
    store: Option<Arc<ThreadListStore>>,
    thread_id: ThreadId,
    classification: InviteClassification,
    state: Mutex<(RsvpState, Option<String>)>,
}

impl RsvpController {
    /// Creates a controller for a message, running invite classification.
    ///
    /// When a store is supplied the archive-on-success effect goes through
    /// it so the active list updates optimistically; otherwise the bridge
    /// is called directly.
    pub fn new(
        message: &Message,
        bridge: Arc<dyn Bridge>,
        store: Option<Arc<ThreadListStore>>,
    ) -> Self {
        Self {
            bridge,
            store,
            thread_id: message.thread_id.clone(),
            classification: classify(message),
            state: Mutex::new((RsvpState::None, None)),
        }
    }

    /// Whether the presented message is an invitation at all.
    pub fn is_invite(&self) -> bool {
        self.classification.is_invite
    }

    /// The extracted event id, when available.
    pub fn event_id(&self) -> Option<&str> {
        self.classification.event_id.as_deref()
    }

    /// Current state.
    pub fn state(&self) -> RsvpState {
        self.state.lock().unwrap().0
    }

    /// Current surfaced error, if any.
    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().1.clone()
    }

    fn apply(&self, event: RsvpEvent) -> Option<RsvpEffect> {
        let mut state = self.state.lock().unwrap();
        let outcome = transition(state.0, event);
        state.0 = outcome.next;
        state.1 = outcome.error;
        outcome.effect
    }

    /// Handles a user RSVP action.
    ///
    /// Rejected synchronously (with a surfaced message) when no event id
    /// is available. On success the hosting thread is archived exactly
    /// once; an archive failure does not revert the RSVP state. On remote
    /// failure the state reverts to `None` with the error surfaced.
    pub async fn respond(&self, response: RsvpResponse) {
        if !self.is_invite() {
            return;
        }

        let event = RsvpEvent::Respond {
            response,
            has_event_id: self.classification.event_id.is_some(),
        };
        let Some(RsvpEffect::CallRemote(response)) = self.apply(event) else {
            return;
        };

        // checked above: CallRemote is only emitted with an event id present
        let event_id = match self.classification.event_id.as_deref() {
            Some(id) => id,
            None => return,
        };

        let follow_up = match self.bridge.calendar_rsvp(event_id, response).await {
            Ok(()) => self.apply(RsvpEvent::RemoteOk(response)),
            Err(e) => {
                tracing::warn!(event_id, "calendar RSVP failed: {e}");
                self.apply(RsvpEvent::RemoteErr(e.to_string()))
            }
        };

        if follow_up == Some(RsvpEffect::ArchiveThread) {
            self.archive_thread().await;
        }
    }

    /// Handles the explicit "change response" action.
    pub fn reset(&self) {
        self.apply(RsvpEvent::Reset);
    }

    async fn archive_thread(&self) {
        match &self.store {
            Some(store) => store.archive(&self.thread_id).await,
            None => {
                if let Err(e) = self.bridge.archive_thread(&self.thread_id).await {
                    tracing::warn!(thread_id = %self.thread_id, "archive after RSVP failed: {e}");
                }
            }
        }
    }
}
