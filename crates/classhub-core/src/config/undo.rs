//! Undo window and action log configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Settings for the reversible-action log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoConfig {
    /// Seconds after creation during which an action can be undone.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    /// Upper bound on retained action records. Terminal records past the
    /// bound are pruned oldest-first; pending records are never pruned.
    #[serde(default = "default_max_tracked")]
    pub max_tracked_actions: usize,
    /// Capacity of the action event broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl UndoConfig {
    /// The undo window as a duration.
    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_seconds as i64)
    }
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window(),
            max_tracked_actions: default_max_tracked(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_window() -> u64 {
    10
}

fn default_max_tracked() -> usize {
    256
}

fn default_event_buffer() -> usize {
    64
}
