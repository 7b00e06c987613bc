#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Exponential backoff with jitter, and the failure taxonomy every retryable
//! operation in the indexer classifies itself against.
//!
//! Callers do not hand this crate a generic [`std::error::Error`]: they
//! implement [`Retryable`] so the policy can tell a missing resource (do not
//! retry, surface immediately) apart from a transient transport failure (keep
//! retrying) apart from a structural parse failure (surface immediately, but
//! for a different reason than "not found").

use std::time::Duration;

use backon::{Backoff, BackoffBuilder};
use rand::Rng;
use tracing::warn;

/// How a failed operation should be treated by [`retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The resource genuinely does not exist (e.g. a block past the chain
    /// tip). Retrying cannot help; the caller should treat this as `None`
    /// rather than an error.
    NotFound,
    /// A transport- or node-level failure (timeout, connection reset, 5xx).
    /// Worth retrying, possibly against a different endpoint.
    Transient,
    /// The response was well-formed at the transport level but failed to
    /// decode into the expected shape. Retrying against the same or a
    /// different endpoint will not fix a wire-format mismatch.
    Structural,
}

/// An error an operation passed to [`retry`] can classify itself as.
pub trait Retryable {
    /// How this failure should be treated.
    fn disposition(&self) -> Disposition;
}

/// Exponential-backoff-with-jitter parameters.
///
/// Given attempt `k` (1-indexed), the delay before the next attempt is
/// `base_delay * 2^(k-1)` when `exponential` is set, else a flat
/// `base_delay`; when `jitter` is set the delay is then scaled by a uniform
/// random factor in `[1.0, 1.5)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts made before giving up, including the first.
    pub max_attempts: u32,
    /// The base delay `D` in the backoff formula.
    pub base_delay: Duration,
    /// Whether the delay doubles each attempt or stays flat at `base_delay`.
    pub exponential: bool,
    /// Whether a uniform `[1.0, 1.5)` jitter factor is applied to the delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay: Duration::from_secs(2), exponential: true, jitter: true }
    }
}

/// A [`backon::Backoff`] iterator that reproduces [`RetryPolicy`]'s exact
/// delay formula.
///
/// `backon`'s own [`backon::ExponentialBuilder`] jitters by adding a random
/// fraction of the computed delay; ours multiplies the whole delay by a
/// factor drawn from `[1.0, 1.5)`, so a bespoke iterator is needed to stay
/// bit-for-bit faithful to that formula.
#[derive(Debug, Clone)]
pub struct PolicyBackoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Iterator for PolicyBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt > self.policy.max_attempts.saturating_sub(1) {
            return None;
        }
        let mut delay = if self.policy.exponential {
            self.policy.base_delay * 2u32.saturating_pow(self.attempt - 1)
        } else {
            self.policy.base_delay
        };
        if self.policy.jitter {
            let factor = rand::thread_rng().gen_range(1.0..1.5);
            delay = delay.mul_f64(factor);
        }
        Some(delay)
    }
}

impl BackoffBuilder for RetryPolicy {
    type Backoff = PolicyBackoff;

    fn build(&self) -> Self::Backoff {
        PolicyBackoff { policy: *self, attempt: 0 }
    }
}

/// Runs `op`, retrying per `policy` while the error's [`Disposition`] is
/// [`Disposition::Transient`].
///
/// A [`Disposition::NotFound`] or [`Disposition::Structural`] error is
/// surfaced on the first occurrence without consuming a retry attempt. Once
/// `policy.max_attempts` is exhausted, the last transient error is returned.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, op_name: &str, mut op: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut backoff = policy.build();
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => match err.disposition() {
                Disposition::NotFound | Disposition::Structural => return Err(err),
                Disposition::Transient => {
                    if attempt >= policy.max_attempts {
                        tracing::error!(op = op_name, attempt, "all retry attempts exhausted");
                        return Err(err);
                    }
                    let delay = backoff.next().unwrap_or(policy.base_delay);
                    warn!(op = op_name, attempt, delay_ms = delay.as_millis() as u64, "retrying after transient failure");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            },
        }
    }
}
