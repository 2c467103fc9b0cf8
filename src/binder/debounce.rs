//! Trailing-edge debounce with a single pending deadline.

use std::time::{Duration, Instant};

/// Holds at most one pending deadline. Each new event clears the pending
/// deadline and sets a fresh one `delay` later; the action fires once the
/// deadline passes without another event.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    pending: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register an event at `now`. Returns true if it replaced a pending
    /// deadline.
    pub fn schedule(&mut self, now: Instant) -> bool {
        self.pending.replace(now + self.delay).is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending deadline without firing. Returns true if one existed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    /// Feed events at the given millisecond offsets and count firings,
    /// checking the timer before each event the way the binder loop does.
    fn fires_for(offsets_ms: &[u64]) -> usize {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);
        let mut fired = 0;

        for &offset in offsets_ms {
            let now = start + Duration::from_millis(offset);
            if debounce.fire_if_due(now) {
                fired += 1;
            }
            debounce.schedule(now);
        }

        if let Some(deadline) = debounce.deadline() {
            if debounce.fire_if_due(deadline) {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn test_burst_fires_once() {
        assert_eq!(fires_for(&[0, 10, 20, 30, 40]), 1);
        // Each gap is under the delay even though the burst spans 600ms.
        assert_eq!(fires_for(&[0, 150, 300, 450, 600]), 1);
    }

    #[test]
    fn test_spaced_events_each_fire() {
        assert_eq!(fires_for(&[0, 200, 400]), 3);
        assert_eq!(fires_for(&[0, 500, 1200]), 3);
    }

    #[test]
    fn test_mixed_spacing() {
        assert_eq!(fires_for(&[0, 50, 100, 400, 450, 1000]), 3);
    }

    #[test]
    fn test_schedule_resets_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);

        assert!(!debounce.schedule(start));
        assert!(debounce.schedule(start + Duration::from_millis(100)));
        assert_eq!(
            debounce.deadline(),
            Some(start + Duration::from_millis(300))
        );
        assert!(!debounce.fire_if_due(start + Duration::from_millis(250)));
        assert!(debounce.fire_if_due(start + Duration::from_millis(300)));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debounce = Debounce::new(DELAY);
        assert!(!debounce.cancel());
        debounce.schedule(Instant::now());
        assert!(debounce.cancel());
        assert!(debounce.deadline().is_none());
    }
}
