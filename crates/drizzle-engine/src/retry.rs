//! Explicit retry state for in-flight transfer attempts.
//!
//! Each attempt carries its own [`Backoff`] value advanced by the worker
//! loop; there is no hidden recursion or ambient retry machinery.

use std::time::Duration;

/// Exponential backoff schedule with an attempt cap.
///
/// `attempt` counts submissions already made. While attempts remain below
/// the cap, [`next_delay`](Backoff::next_delay) yields the delay to sleep
/// before the next try, doubling each time up to `max_delay`.
#[derive(Debug, Clone)]
pub struct Backoff {
    attempt: u32,
    cap: u32,
    delay: Duration,
    max_delay: Duration,
}

impl Backoff {
    /// A schedule allowing `cap` attempts in total, starting at `base`
    /// delay and doubling up to `max_delay`.
    pub fn new(cap: u32, base: Duration, max_delay: Duration) -> Self {
        Self {
            // The first submission is attempt 1.
            attempt: 1,
            cap,
            delay: base,
            max_delay,
        }
    }

    /// Attempts made so far (including the in-flight one).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Advance to the next attempt, returning the delay to wait first.
    ///
    /// Returns `None` once the cap is reached, at which point the caller
    /// records the entry as failed.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.cap {
            return None;
        }
        self.attempt += 1;
        let delay = self.delay;
        self.delay = (self.delay * 2).min(self.max_delay);
        Some(delay)
    }
}
