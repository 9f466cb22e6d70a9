//! Outbound API throttle and bounded retry
//!
//! Every remote call first acquires the global rate limiter, then runs under
//! a bounded retry budget with exponential backoff and jitter. The remote's
//! throttle hint, when present, becomes a floor on the next wait. Pagination
//! state never advances past a failed call because the same closure is
//! re-invoked until it succeeds or the budget runs out.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rand::Rng;
use tracing::debug;

use clan_core::traits::{ApiError, ApiResponse};

use super::error::FetchError;

/// Retry budget and pacing for outbound calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never unbounded.
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry_index` (1-based), with up to 25%
    /// jitter so parallel workers fan out.
    fn backoff(&self, retry_index: u32) -> Duration {
        let shift = retry_index.saturating_sub(1).min(16);
        let exp = self.base_backoff.saturating_mul(1u32 << shift);
        let capped = exp.min(self.max_backoff);
        let jitter_ceiling = (capped.as_millis() as u64) / 4;
        let jitter = rand::thread_rng().gen_range(0..=jitter_ceiling);
        capped + Duration::from_millis(jitter)
    }
}

/// Global throttle in front of the game-statistics API
pub struct ApiThrottle {
    limiter: DefaultDirectRateLimiter,
    policy: RetryPolicy,
}

impl ApiThrottle {
    pub fn new(requests_per_second: u32, policy: RetryPolicy) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second.max(1)).expect("clamped to at least 1"),
        );
        Self {
            limiter: RateLimiter::direct(quota),
            policy,
        }
    }

    /// Run `call` under the rate limiter with bounded retries.
    ///
    /// Transport faults and throttled envelopes are retried; any other
    /// well-formed envelope (success or business code) is returned to the
    /// caller for error-code handling.
    pub async fn call<T, F, Fut>(&self, call: F) -> Result<ApiResponse<T>, FetchError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<ApiResponse<T>, ApiError>>,
    {
        let mut last_error = String::new();
        let mut throttle_hint: Option<Duration> = None;

        for attempt in 1..=self.policy.max_attempts.max(1) {
            if attempt > 1 {
                let mut wait = self.policy.backoff(attempt - 1);
                if let Some(hint) = throttle_hint.take() {
                    wait = wait.max(hint);
                }
                let wait_ms = wait.as_millis() as u64;
                debug!(attempt, wait_ms, "retrying remote call");
                tokio::time::sleep(wait).await;
            }

            self.limiter.until_ready().await;

            match call().await {
                Ok(envelope) if envelope.throttle_seconds > 0 && !envelope.is_success() => {
                    throttle_hint =
                        Some(Duration::from_secs(u64::from(envelope.throttle_seconds)));
                    last_error = format!(
                        "remote throttled for {}s: {}",
                        envelope.throttle_seconds, envelope.message
                    );
                }
                Ok(envelope) => return Ok(envelope),
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(FetchError::Exhausted {
            attempts: self.policy.max_attempts.max(1),
            last_error,
        })
    }
}
