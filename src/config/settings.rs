//! Application configuration types.
//!
//! Configuration is owned and persisted by an external settings
//! collaborator; the core receives it through
//! [`Bridge::get_config`](crate::bridge::Bridge::get_config) and treats
//! it as read-only.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Timing knobs for background timers.
    pub timing: TimingConfig,
    /// Thread fetching limits.
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Timer intervals and delays.
///
/// The reconcile delay is chosen to outlast the label mutations of a view
/// move landing server-side; the focus intervals bound how long embedded
/// content can hold keyboard focus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay before the reconciliation fetch after a label move, in ms.
    pub reconcile_delay_ms: u64,
    /// Focus guardian poll interval, in ms.
    pub focus_poll_interval_ms: u64,
    /// Delay before the re-check after a host window blur, in ms.
    pub focus_blur_recheck_ms: u64,
    /// Badge/unread-count refresh interval, in ms.
    pub badge_refresh_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reconcile_delay_ms: 2_500,
            focus_poll_interval_ms: 1_000,
            focus_blur_recheck_ms: 150,
            badge_refresh_interval_ms: 60_000,
        }
    }
}

impl TimingConfig {
    /// Reconcile delay as a [`Duration`].
    pub fn reconcile_delay(&self) -> Duration {
        Duration::from_millis(self.reconcile_delay_ms)
    }

    /// Focus poll interval as a [`Duration`].
    pub fn focus_poll_interval(&self) -> Duration {
        Duration::from_millis(self.focus_poll_interval_ms)
    }

    /// Blur re-check delay as a [`Duration`].
    pub fn focus_blur_recheck(&self) -> Duration {
        Duration::from_millis(self.focus_blur_recheck_ms)
    }

    /// Badge refresh interval as a [`Duration`].
    pub fn badge_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.badge_refresh_interval_ms)
    }
}

/// Thread fetching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum threads fetched per view load.
    pub thread_limit: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { thread_limit: 50 }
    }
}
