//! Emission coordinator configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Polling policy for sink readiness
///
/// Defaults give a one second ceiling on waiting for the sink: ten
/// attempts, 100ms apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerConfig {
    /// Readiness checks before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between readiness checks, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_interval_ms() -> u64 {
    100
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl TrackerConfig {
    /// Delay between readiness checks
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
