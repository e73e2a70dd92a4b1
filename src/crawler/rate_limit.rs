//! Request pacing for the fetcher
//!
//! A single limiter is owned by each [`Fetcher`](super::Fetcher) and spaces
//! every request it issues at least `min_interval` after the previous one
//! finished. It uses tokio's clock so tests can run it on a paused runtime.

use std::time::Duration;
use tokio::time::Instant;

/// Tracks when the last request finished and how long to wait before the next
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Minimum time between the end of one request and the start of the next
    min_interval: Duration,

    /// Timestamp of the last completed request
    last_request_time: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter that has not seen any request yet
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request_time: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Sleeps until a request is allowed
    pub async fn wait(&self) {
        if let Some(delay) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Rate limiting: sleeping {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Records that a request finished at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }
}
