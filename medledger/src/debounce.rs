//! Deadline-based debouncer for text input.
//!
//! The render loop owns the debouncer and polls it with the current
//! [`Instant`]; no timer task is involved. Every new input cancels the pending
//! value and reschedules the deadline.

use std::time::{Duration, Instant};

/// Inactivity window used for patient search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input, replacing any value still waiting to fire.
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value once its inactivity window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(self.pending, Some((_, deadline)) if now >= deadline);
        if due {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Time left until the pending value fires, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.input("ada", start);

        assert_eq!(d.poll(start + ms(499)), None);
        assert_eq!(d.poll(start + ms(500)), Some("ada"));
        // Fires exactly once
        assert_eq!(d.poll(start + ms(2000)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_new_input_resets_deadline() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.input("a", start);
        d.input("ad", start + ms(300));
        d.input("ada", start + ms(600));

        // 500ms after the first keystroke, but the window was reset twice
        assert_eq!(d.poll(start + ms(800)), None);
        assert_eq!(d.remaining(start + ms(800)), Some(ms(300)));
        assert_eq!(d.poll(start + ms(1100)), Some("ada"));
    }

    #[test]
    fn test_cancel_discards_pending() {
        let start = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.input(1, start);
        d.cancel();
        assert_eq!(d.poll(start + ms(1000)), None);
        assert_eq!(d.remaining(start), None);
    }

    #[test]
    fn test_default_uses_search_window() {
        let d: Debouncer<String> = Debouncer::default();
        assert_eq!(d.delay(), SEARCH_DEBOUNCE);
    }
}
