//! Host configuration.

use serde::{Deserialize, Serialize};

use crate::curve::DurationBehavior;

/// Per-host settings and capacity hints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Whether impl-only scroll offset animations may be created on this host.
    pub supports_scroll_animations: bool,

    /// Duration policy for impl-only scroll offset animations.
    pub scroll_duration_behavior: DurationBehavior,

    /// Initial capacity of the per-pass event list.
    pub events_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            supports_scroll_animations: true,
            scroll_duration_behavior: DurationBehavior::DeltaBased,
            events_capacity: 16,
        }
    }
}
