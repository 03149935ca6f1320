//! perch - core algorithms for a keyboard-driven Gmail thread client
//!
//! This crate provides the presentation-independent core of the client:
//! content classification (calendar invites, quoted content), the
//! managed-label view state machine over an optimistic thread cache, and
//! the focus reclamation guardian. All host integration goes through the
//! [`bridge::Bridge`] trait.

pub mod app;
pub mod bridge;
pub mod classify;
pub mod config;
pub mod domain;
pub mod services;

pub use app::Session;
