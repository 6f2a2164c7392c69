use core::time::Duration;

use web_time::Instant;

/// Client-observed play time, measured from the moment the start response
/// arrived. Server-reported timing never feeds into it.
#[derive(Clone, Debug, PartialEq)]
pub struct ElapsedTracker {
    started_at: Instant,
    frozen_at: Option<Instant>,
    last_emitted: u64,
}

impl ElapsedTracker {
    pub fn started(now: Instant) -> Self {
        Self {
            started_at: now,
            frozen_at: None,
            last_emitted: 0,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.frozen_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    /// Whole seconds played, never less than a value already emitted.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs().max(self.last_emitted)
    }

    /// Called by the 1 Hz host tick; yields only when the displayed second changes.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        let secs = self.elapsed_secs(now);
        if secs != self.last_emitted {
            self.last_emitted = secs;
            Some(secs)
        } else {
            None
        }
    }

    /// Stops the clock. Later calls keep the first freeze point.
    pub fn freeze(&mut self, now: Instant) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(now);
            log::debug!("clock frozen at {}s", self.elapsed_secs(now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn counts_whole_seconds_from_start() {
        let t0 = Instant::now();
        let tracker = ElapsedTracker::started(t0);

        assert_eq!(tracker.elapsed_secs(t0), 0);
        assert_eq!(tracker.elapsed_secs(t0 + Duration::from_millis(1999)), 1);
        assert_eq!(tracker.elapsed_secs(t0 + secs(42)), 42);
    }

    #[test]
    fn poll_emits_only_on_change() {
        let t0 = Instant::now();
        let mut tracker = ElapsedTracker::started(t0);

        assert_eq!(tracker.poll(t0 + Duration::from_millis(400)), None);
        assert_eq!(tracker.poll(t0 + secs(1)), Some(1));
        assert_eq!(tracker.poll(t0 + Duration::from_millis(1500)), None);
        assert_eq!(tracker.poll(t0 + secs(3)), Some(3));
    }

    #[test]
    fn freezing_keeps_the_last_value() {
        let t0 = Instant::now();
        let mut tracker = ElapsedTracker::started(t0);

        tracker.freeze(t0 + secs(5));
        tracker.freeze(t0 + secs(9));

        assert!(tracker.is_frozen());
        assert_eq!(tracker.elapsed_secs(t0 + secs(60)), 5);
        assert_eq!(tracker.poll(t0 + secs(60)), Some(5));
        assert_eq!(tracker.poll(t0 + secs(120)), None);
    }

    #[test]
    fn never_goes_backwards() {
        let t0 = Instant::now();
        let mut tracker = ElapsedTracker::started(t0 + secs(2));

        assert_eq!(tracker.poll(t0 + secs(10)), Some(8));
        assert_eq!(tracker.elapsed_secs(t0 + secs(4)), 8);
        assert_eq!(tracker.elapsed_secs(t0), 8);
    }
}
