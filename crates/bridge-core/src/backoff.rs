//! Reconnect backoff calculation.
//!
//! Capped exponential delay between reconnect attempts. The attempt counter
//! advances on every scheduled reconnect and is reset only when a connection
//! actually reaches the open state, so a failure streak keeps climbing toward
//! the cap. Retries are unbounded: the policy never exhausts, the client
//! keeps trying until it is explicitly shut down.

use std::time::Duration;

use crate::constants::{RECONNECT_BASE_DELAY_MS, RECONNECT_MAX_DELAY_MS};

/// Calculate the reconnect delay for a zero-based attempt index.
///
/// Formula: `min(max_delay, base_delay * 2^attempt)`.
#[must_use]
pub fn reconnect_delay_ms(attempt: u32, base_delay_ms: u64, max_delay_ms: u64) -> u64 {
    // Shift clamp keeps very high attempt counts from overflowing.
    let exponential = base_delay_ms.saturating_mul(1u64 << attempt.min(31));
    exponential.min(max_delay_ms)
}

/// Exponential backoff state for the reconnect loop.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectBackoff {
    base_delay_ms: u64,
    max_delay_ms: u64,
    attempt: u32,
}

impl ReconnectBackoff {
    /// Create a backoff with the given base delay and cap.
    #[must_use]
    pub fn new(base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            max_delay_ms,
            attempt: 0,
        }
    }

    /// Number of reconnects scheduled since the last reset.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Reset the attempt counter. Called when a connection reaches open.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Return the delay to wait before the next attempt and advance the
    /// counter for the one after.
    pub fn next_delay(&mut self) -> Duration {
        let delay = reconnect_delay_ms(self.attempt, self.base_delay_ms, self.max_delay_ms);
        self.attempt = self.attempt.saturating_add(1);
        Duration::from_millis(delay)
    }
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(RECONNECT_BASE_DELAY_MS, RECONNECT_MAX_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- reconnect_delay_ms --

    #[test]
    fn delay_doubles_per_attempt() {
        assert_eq!(reconnect_delay_ms(0, 1000, 30_000), 1000);
        assert_eq!(reconnect_delay_ms(1, 1000, 30_000), 2000);
        assert_eq!(reconnect_delay_ms(2, 1000, 30_000), 4000);
        assert_eq!(reconnect_delay_ms(3, 1000, 30_000), 8000);
        assert_eq!(reconnect_delay_ms(4, 1000, 30_000), 16_000);
    }

    #[test]
    fn delay_caps_at_max() {
        assert_eq!(reconnect_delay_ms(5, 1000, 30_000), 30_000);
        assert_eq!(reconnect_delay_ms(6, 1000, 30_000), 30_000);
    }

    #[test]
    fn delay_never_decreases() {
        let mut previous = 0;
        for attempt in 0..40 {
            let delay = reconnect_delay_ms(attempt, 1000, 30_000);
            assert!(delay >= previous, "delay regressed at attempt {attempt}");
            previous = delay;
        }
    }

    #[test]
    fn high_attempt_does_not_overflow() {
        let delay = reconnect_delay_ms(u32::MAX, 1000, 30_000);
        assert_eq!(delay, 30_000);
    }

    // -- ReconnectBackoff --

    #[test]
    fn default_uses_crate_constants() {
        let mut backoff = ReconnectBackoff::default();
        assert_eq!(backoff.next_delay(), Duration::from_millis(1000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(2000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(4000));
    }

    #[test]
    fn next_delay_advances_attempt() {
        let mut backoff = ReconnectBackoff::new(1000, 30_000);
        assert_eq!(backoff.attempt(), 0);
        let _ = backoff.next_delay();
        assert_eq!(backoff.attempt(), 1);
        let _ = backoff.next_delay();
        assert_eq!(backoff.attempt(), 2);
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut backoff = ReconnectBackoff::new(1000, 30_000);
        let _ = backoff.next_delay();
        let _ = backoff.next_delay();
        let _ = backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.attempt(), 0);
        // Next close-triggered reconnect starts over at the base delay.
        assert_eq!(backoff.next_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn never_exhausts() {
        let mut backoff = ReconnectBackoff::new(1000, 30_000);
        for _ in 0..1000 {
            let delay = backoff.next_delay();
            assert!(delay <= Duration::from_millis(30_000));
        }
        assert_eq!(backoff.attempt(), 1000);
    }
}
