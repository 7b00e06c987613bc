use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy configuration, mapped onto `indexer_retry::RetryPolicy` at
/// startup.
///
/// Defaults mirror the original indexer's `async_retry` decorator defaults
/// of 5 attempts, a 2 second base delay, exponential backoff, and jitter
/// enabled.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts made before giving up, including the first.
    pub max_attempts: u32,
    /// The base delay in the backoff formula.
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Whether the delay doubles each attempt or stays flat.
    pub exponential: bool,
    /// Whether a uniform `[1.0, 1.5)` jitter factor is applied to the delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay: Duration::from_secs(2), exponential: true, jitter: true }
    }
}
