//! Configuration for the provider health poller.

use serde::{Deserialize, Serialize};

/// Configuration for periodic provider refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between refresh ticks
    pub interval_seconds: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
        }
    }
}
