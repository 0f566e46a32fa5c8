//! Trailing-edge debounce for autosave.
//!
//! Editors save a short quiet period after the last edit rather than on
//! every keystroke. The debouncer is driven by caller-supplied instants so
//! it has no timers or threads of its own.

use std::time::{Duration, Instant};

/// Quiet period after the last edit before a save fires.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// What the editor header shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// Edited since the last successful save.
    Pending,
    Saving,
}

#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record activity, restarting the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the quiet period has elapsed since the last touch.
    pub fn due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left before the call becomes due, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consume a due call. Returns true at most once per quiet period.
    pub fn take(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::default();
        d.touch(start);
        assert!(!d.due(start + Duration::from_millis(999)));
        assert!(d.take(start + Duration::from_millis(1000)));
        assert!(!d.take(start + Duration::from_millis(2000)));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_touch_restarts_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.touch(start);
        d.touch(start + Duration::from_millis(80));
        assert!(!d.take(start + Duration::from_millis(150)));
        assert_eq!(
            d.remaining(start + Duration::from_millis(150)),
            Some(Duration::from_millis(30))
        );
        assert!(d.take(start + Duration::from_millis(180)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::default();
        d.touch(start);
        d.cancel();
        assert!(!d.due(start + Duration::from_secs(5)));
        assert_eq!(d.remaining(start), None);
    }
}
