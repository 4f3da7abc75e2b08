//! Circuit breaker shared by every request a provider makes.
//!
//! A 403 trips it at once; `failure_threshold` consecutive failures (429s,
//! 5xx) trip it as well. While open, every request is refused until the
//! cooldown has elapsed.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug)]
struct Inner {
    tripped_at: Option<Instant>,
    consecutive_failures: u32,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tripped_at: None,
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// 30-minute cooldown, trips after 3 consecutive failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(30 * 60), 3)
    }

    // State stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a request may go out now. Closes the breaker once the cooldown expires.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.lock();
        match inner.tripped_at {
            None => true,
            Some(at) if at.elapsed() >= self.cooldown => {
                inner.tripped_at = None;
                inner.consecutive_failures = 0;
                true
            }
            Some(_) => false,
        }
    }

    pub fn record_success(&self) {
        self.lock().consecutive_failures = 0;
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold && inner.tripped_at.is_none() {
            warn!(
                failures = inner.consecutive_failures,
                cooldown_secs = self.cooldown.as_secs(),
                "circuit breaker tripped"
            );
            inner.tripped_at = Some(Instant::now());
        }
    }

    /// Open immediately (IP ban).
    pub fn trip(&self) {
        let mut inner = self.lock();
        if inner.tripped_at.is_none() {
            warn!(cooldown_secs = self.cooldown.as_secs(), "circuit breaker tripped");
        }
        inner.tripped_at = Some(Instant::now());
    }

    pub fn remaining_cooldown(&self) -> Duration {
        match self.lock().tripped_at {
            None => Duration::ZERO,
            Some(at) => self.cooldown.saturating_sub(at.elapsed()),
        }
    }
}
