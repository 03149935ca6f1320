//! Business services layer.
//!
//! This module contains the core services that orchestrate thread-list
//! state, view membership, RSVP flow, and focus reclamation over the
//! bridge contract.
//!
//! # Architecture
//!
//! ```text
//! Presentation layer (external)
//!          |
//!          v
//!    Services layer  <-- You are here
//!          |
//!          v
//!     Bridge (host shell)
//! ```
//!
//! - [`ThreadListStore`]: optimistic in-memory cache for the active view
//! - [`ViewReconciler`]: single-managed-label invariant and reconcile timer
//! - [`RsvpController`]: per-message calendar RSVP state machine
//! - [`FocusGuardian`]: focus reclamation from embedded content
//! - [`BadgeRefresher`]: periodic unread count and notifications

mod badge;
mod focus;
mod reconciler;
mod rsvp;
mod thread_list;

#[cfg(test)]
pub(crate) mod test_support;

pub use badge::BadgeRefresher;
pub use focus::{FocusGuardian, FocusHost, FocusTarget};
pub use reconciler::{ReconcilePhase, ViewReconciler};
pub use rsvp::{transition, RsvpController, RsvpEffect, RsvpEvent, RsvpState, Transition};
pub use thread_list::{StoreError, StoreResult, ThreadListStore};
