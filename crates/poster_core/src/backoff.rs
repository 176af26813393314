//! Adaptive polling interval and attempt ceiling.

use std::time::Duration;

/// Tunable parameters for status polling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// Delay before the first status request.
    pub initial_interval: Duration,
    /// Upper bound on the delay between requests.
    pub max_interval: Duration,
    /// Growth factor applied after each non-terminal response.
    pub multiplier: f64,
    /// Requests issued before the job is declared timed out.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(3_000),
            max_interval: Duration::from_millis(15_000),
            multiplier: 1.5,
            max_attempts: 60,
        }
    }
}

impl PollPolicy {
    /// Returns a policy whose interval sequence is guaranteed non-decreasing
    /// and bounded: multiplier at least 1, initial interval at most the cap,
    /// at least one attempt.
    pub fn normalized(self) -> Self {
        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier
        } else {
            1.0
        };
        Self {
            initial_interval: self.initial_interval.min(self.max_interval),
            max_interval: self.max_interval,
            multiplier,
            max_attempts: self.max_attempts.max(1),
        }
    }

    /// `min(current * multiplier, max_interval)`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let next_ms = (current.as_millis() as f64 * self.multiplier) as u64;
        Duration::from_millis(next_ms).min(self.max_interval)
    }

    /// The delays preceding each request, assuming every response is non-terminal.
    pub fn intervals(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_interval), |current| {
            Some(self.next_interval(*current))
        })
        .take(self.max_attempts as usize)
    }
}

/// Polling progress for the job currently being generated.
#[derive(Debug, Clone, PartialEq)]
pub struct PollAttempt {
    policy: PollPolicy,
    count: u32,
    interval: Duration,
}

impl PollAttempt {
    pub fn new(policy: PollPolicy) -> Self {
        let policy = policy.normalized();
        Self {
            policy,
            count: 0,
            interval: policy.initial_interval,
        }
    }

    /// Requests issued so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Delay before the next request.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the ceiling has been reached; no further request may be issued.
    pub fn is_exhausted(&self) -> bool {
        self.count >= self.policy.max_attempts
    }

    /// Counts a request as issued. Called before the request is sent.
    pub fn record_request(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Grows the interval after a non-terminal response.
    pub fn back_off(&mut self) {
        self.interval = self.policy.next_interval(self.interval);
    }
}
