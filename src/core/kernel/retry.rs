use reqwest::Method;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;

/// How the pause between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    #[default]
    Fixed,
    /// Doubles after every failed attempt
    Exponential,
}

/// Retry budget for transport failures (connection errors, timeouts).
///
/// Business errors and malformed responses are never retried. Mutating
/// requests get a single attempt unless `retry_mutations` is set, because
/// the exchange does not deduplicate a resent order or transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
    pub retry_mutations: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            backoff: Backoff::Fixed,
            retry_mutations: false,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            ..Self::default()
        }
    }

    /// Policy that sends every request exactly once
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_retry_mutations(mut self, retry_mutations: bool) -> Self {
        self.retry_mutations = retry_mutations;
        self
    }

    /// Total attempts allowed for a request with this method
    pub fn attempts_for(&self, method: &Method) -> u32 {
        let idempotent = *method == Method::GET || *method == Method::HEAD;
        if idempotent || self.retry_mutations {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Delays slept before each re-attempt; its length is `attempts_for(method) - 1`
    pub fn schedule(&self, method: &Method) -> Vec<Duration> {
        let retries = self.attempts_for(method).saturating_sub(1) as usize;
        match self.backoff {
            Backoff::Fixed => FixedInterval::new(self.delay).take(retries).collect(),
            Backoff::Exponential => (0..retries)
                .map(|i| self.delay.saturating_mul(1_u32 << i.min(16)))
                .collect(),
        }
    }
}
