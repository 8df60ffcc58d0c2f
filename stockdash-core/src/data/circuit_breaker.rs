//! Circuit breaker guarding the Yahoo provider.
//!
//! HTTP 403 trips the breaker immediately; consecutive failures (429, 5xx)
//! trip it once they reach the threshold. While open, every request is
//! refused until the cooldown has elapsed.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    Closed { failures: u32 },
    Open { since: Instant },
}

#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            state: Mutex::new(BreakerState::Closed { failures: 0 }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        // A poisoned lock still holds a valid state value.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True if a request may go out. An expired cooldown closes the breaker.
    pub fn allows_request(&self) -> bool {
        let mut state = self.lock();
        match *state {
            BreakerState::Closed { .. } => true,
            BreakerState::Open { since } if since.elapsed() >= self.cooldown => {
                *state = BreakerState::Closed { failures: 0 };
                true
            }
            BreakerState::Open { .. } => false,
        }
    }

    pub fn note_success(&self) {
        let mut state = self.lock();
        if let BreakerState::Closed { failures } = &mut *state {
            *failures = 0;
        }
    }

    pub fn note_failure(&self) {
        let mut state = self.lock();
        if let BreakerState::Closed { failures } = *state {
            let failures = failures + 1;
            *state = if failures >= self.failure_threshold {
                warn!(failures, "data provider breaker opened");
                BreakerState::Open { since: Instant::now() }
            } else {
                BreakerState::Closed { failures }
            };
        }
    }

    /// Open immediately, e.g. on an IP ban.
    pub fn trip_now(&self) {
        warn!("data provider breaker tripped");
        *self.lock() = BreakerState::Open { since: Instant::now() };
    }

    pub fn remaining_cooldown(&self) -> Duration {
        match *self.lock() {
            BreakerState::Closed { .. } => Duration::ZERO,
            BreakerState::Open { since } => self.cooldown.saturating_sub(since.elapsed()),
        }
    }
}

impl Default for CircuitBreaker {
    /// Thirty-minute cooldown, three strikes.
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60), 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert!(CircuitBreaker::default().allows_request());
    }

    #[test]
    fn opens_at_threshold() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        cb.note_failure();
        cb.note_failure();
        assert!(cb.allows_request());
        cb.note_failure();
        assert!(!cb.allows_request());
        assert!(cb.remaining_cooldown() > Duration::ZERO);
    }

    #[test]
    fn success_resets_strikes() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 2);
        cb.note_failure();
        cb.note_success();
        cb.note_failure();
        assert!(cb.allows_request());
    }

    #[test]
    fn zero_cooldown_recloses() {
        let cb = CircuitBreaker::new(Duration::ZERO, 1);
        cb.trip_now();
        assert!(cb.allows_request());
    }
}
