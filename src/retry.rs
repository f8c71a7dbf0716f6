//! Retry policy for transient HTTP failures.
//!
//! Only rate limiting (429) and server errors (>= 500) are eligible;
//! transport-level failures are surfaced immediately. The waits grow
//! exponentially from the minimum bound, capped at the maximum, with uniform
//! jitter over the resulting window.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use rand::Rng;

/// Decides whether a status code warrants a retry of a fresh request.
pub type RetryPredicate = Arc<dyn Fn(StatusCode) -> bool + Send + Sync>;

/// Maps an attempt index (0-based) and the policy bounds to a wait.
pub type BackoffFn = Arc<dyn Fn(u32, Duration, Duration) -> Duration + Send + Sync>;

/// Bounded retry with exponential backoff.
#[derive(Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
    retry_when: Option<RetryPredicate>,
    backoff_fn: Option<BackoffFn>,
}

impl Default for RetryPolicy {
    /// Five retries between 100 ms and 400 ms, matching the API's published
    /// client guidance.
    fn default() -> Self {
        Self {
            max_retries: 5,
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_millis(400),
            retry_when: None,
            backoff_fn: None,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("min_wait", &self.min_wait)
            .field("max_wait", &self.max_wait)
            .field("retry_when", &self.retry_when.as_ref().map(|_| "custom"))
            .field("backoff_fn", &self.backoff_fn.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_retries,
            min_wait,
            max_wait,
            ..Self::default()
        }
    }

    /// Replaces the status predicate.
    pub fn retry_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(StatusCode) -> bool + Send + Sync + 'static,
    {
        self.retry_when = Some(Arc::new(predicate));
        self
    }

    /// Replaces the backoff function.
    pub fn backoff_fn<F>(mut self, backoff: F) -> Self
    where
        F: Fn(u32, Duration, Duration) -> Duration + Send + Sync + 'static,
    {
        self.backoff_fn = Some(Arc::new(backoff));
        self
    }

    /// Whether `status` is eligible for a retry under this policy.
    pub fn should_retry(&self, status: StatusCode) -> bool {
        match &self.retry_when {
            Some(predicate) => predicate(status),
            None => status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
        }
    }

    /// The wait before retry number `attempt` (0-based).
    pub fn wait_for(&self, attempt: u32) -> Duration {
        if let Some(backoff) = &self.backoff_fn {
            return backoff(attempt, self.min_wait, self.max_wait);
        }
        let scaled = self
            .min_wait
            .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
            .min(self.max_wait);
        jitter(self.min_wait.min(scaled), scaled)
    }
}

/// Uniform draw over `[low, high]`.
fn jitter(low: Duration, high: Duration) -> Duration {
    if high <= low {
        return low;
    }
    let millis = rand::rng().random_range(low.as_millis() as u64..=high.as_millis() as u64);
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_statuses() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(policy.should_retry(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(policy.should_retry(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!policy.should_retry(StatusCode::BAD_REQUEST));
        assert!(!policy.should_retry(StatusCode::UNAUTHORIZED));
        assert!(!policy.should_retry(StatusCode::OK));
    }

    #[test]
    fn waits_stay_within_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 0..8 {
            let wait = policy.wait_for(attempt);
            assert!(wait >= policy.min_wait, "attempt {attempt}: {wait:?}");
            assert!(wait <= policy.max_wait, "attempt {attempt}: {wait:?}");
        }
    }

    #[test]
    fn custom_predicate_overrides_defaults() {
        let policy = RetryPolicy::default().retry_when(|status| status == StatusCode::BAD_GATEWAY);
        assert!(policy.should_retry(StatusCode::BAD_GATEWAY));
        assert!(!policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn custom_backoff_overrides_defaults() {
        let policy = RetryPolicy::default()
            .backoff_fn(|attempt, _, _| Duration::from_millis(u64::from(attempt) + 1));
        assert_eq!(policy.wait_for(0), Duration::from_millis(1));
        assert_eq!(policy.wait_for(3), Duration::from_millis(4));
    }
}
