//! Wait schedule produced by a [`WaitStrategy`]

use std::time::Duration;

use crate::core::WaitStrategy;

/// Infinite iterator over the waits of one poll.
///
/// The first item is the wait before attempt 2, the second the wait before
/// attempt 3, and so on. Exponential doubling state lives in the iterator,
/// so every poll builds a fresh one and starts again from `initial`.
#[derive(Debug, Clone)]
pub struct Backoff {
    strategy: WaitStrategy,
    next: Duration,
}

impl Backoff {
    /// Start a schedule for `strategy`.
    pub fn new(strategy: WaitStrategy) -> Self {
        let next = match strategy {
            WaitStrategy::Fixed { interval } => interval,
            WaitStrategy::Exponential { initial, max } => initial.min(max),
        };
        Self { strategy, next }
    }

    /// Wait to apply before the next attempt, advancing the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next;
        if let WaitStrategy::Exponential { max, .. } = self.strategy {
            self.next = current.saturating_mul(2).min(max);
        }
        current
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}
