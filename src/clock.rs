//! Beat clock
//!
//! The sole time authority for a run. The render loop never measures its
//! own elapsed time; it samples this clock and injects the result into the
//! simulation via `set_elapsed_ms`, which is what keeps beat timing immune
//! to frame jitter and tab throttling.
//!
//! Uses `std::time::Instant` with pause accounting. Every operation has an
//! explicit-instant variant (`*_at`) so tests and replay drivers can feed
//! synthetic time.

use std::time::Instant;

/// One clock sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Milliseconds left until the run completes
    pub remaining_ms: f64,
    /// Milliseconds elapsed since start, clamped to the total
    pub elapsed_ms: f64,
    /// True once the full duration has elapsed
    pub done: bool,
}

/// Countdown clock for one playback run.
#[derive(Debug, Clone)]
pub struct BeatClock {
    total_ms: f64,
    /// Elapsed time accumulated across previous running spans
    base_elapsed_ms: f64,
    /// Start of the current running span; `None` while paused or idle
    resumed_at: Option<Instant>,
    started: bool,
}

impl Default for BeatClock {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatClock {
    pub fn new() -> Self {
        Self {
            total_ms: 0.0,
            base_elapsed_ms: 0.0,
            resumed_at: None,
            started: false,
        }
    }

    /// Begin a run of `total_ms` from now
    pub fn start(&mut self, total_ms: f64) {
        self.start_at(total_ms, Instant::now());
    }

    pub fn start_at(&mut self, total_ms: f64, now: Instant) {
        self.total_ms = total_ms.max(0.0);
        self.base_elapsed_ms = 0.0;
        self.resumed_at = Some(now);
        self.started = true;
    }

    /// Freeze elapsed time
    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Some(t0) = self.resumed_at.take() {
            self.base_elapsed_ms += now.duration_since(t0).as_secs_f64() * 1000.0;
        }
    }

    /// Continue after a pause; no-op while running or before start
    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn resume_at(&mut self, now: Instant) {
        if self.started && self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    /// Rescale the run in place: new total duration and new elapsed
    /// position. Used for live tempo changes, where the simulation
    /// re-derives both from the beat count.
    pub fn adjust(&mut self, new_total_ms: f64, new_elapsed_ms: f64) {
        self.adjust_at(new_total_ms, new_elapsed_ms, Instant::now());
    }

    pub fn adjust_at(&mut self, new_total_ms: f64, new_elapsed_ms: f64, now: Instant) {
        self.total_ms = new_total_ms.max(0.0);
        self.base_elapsed_ms = new_elapsed_ms.max(0.0);
        if self.resumed_at.is_some() {
            self.resumed_at = Some(now);
        }
    }

    /// Back to idle; elapsed and total cleared
    pub fn reset(&mut self) {
        self.total_ms = 0.0;
        self.base_elapsed_ms = 0.0;
        self.resumed_at = None;
        self.started = false;
    }

    /// Current reading
    pub fn sample(&self) -> ClockTick {
        self.sample_at(Instant::now())
    }

    pub fn sample_at(&self, now: Instant) -> ClockTick {
        let raw = match self.resumed_at {
            Some(t0) => self.base_elapsed_ms + now.duration_since(t0).as_secs_f64() * 1000.0,
            None => self.base_elapsed_ms,
        };
        let elapsed_ms = raw.min(self.total_ms);
        ClockTick {
            remaining_ms: self.total_ms - elapsed_ms,
            elapsed_ms,
            done: self.started && raw >= self.total_ms,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.resumed_at.is_some()
    }

    #[inline]
    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_idle_clock_reads_zero() {
        let clock = BeatClock::new();
        let tick = clock.sample();
        assert_eq!(tick.elapsed_ms, 0.0);
        assert!(!tick.done);
    }

    #[test]
    fn test_elapsed_tracks_time() {
        let t0 = Instant::now();
        let mut clock = BeatClock::new();
        clock.start_at(1000.0, t0);
        let tick = clock.sample_at(t0 + ms(250));
        assert!((tick.elapsed_ms - 250.0).abs() < 1.0);
        assert!((tick.remaining_ms - 750.0).abs() < 1.0);
        assert!(!tick.done);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let t0 = Instant::now();
        let mut clock = BeatClock::new();
        clock.start_at(1000.0, t0);
        clock.pause_at(t0 + ms(300));
        let frozen = clock.sample_at(t0 + ms(800));
        assert!((frozen.elapsed_ms - 300.0).abs() < 1.0);

        clock.resume_at(t0 + ms(900));
        let tick = clock.sample_at(t0 + ms(1000));
        assert!((tick.elapsed_ms - 400.0).abs() < 1.0);
    }

    #[test]
    fn test_done_at_total() {
        let t0 = Instant::now();
        let mut clock = BeatClock::new();
        clock.start_at(500.0, t0);
        assert!(!clock.sample_at(t0 + ms(499)).done);
        let tick = clock.sample_at(t0 + ms(600));
        assert!(tick.done);
        assert_eq!(tick.elapsed_ms, 500.0);
        assert_eq!(tick.remaining_ms, 0.0);
    }

    #[test]
    fn test_adjust_repositions_run() {
        let t0 = Instant::now();
        let mut clock = BeatClock::new();
        clock.start_at(4000.0, t0);
        // Tempo doubled: half the total, elapsed re-derived by the sim
        clock.adjust_at(2000.0, 1000.0, t0 + ms(500));
        let tick = clock.sample_at(t0 + ms(700));
        assert!((tick.elapsed_ms - 1200.0).abs() < 1.0);
        assert!((tick.remaining_ms - 800.0).abs() < 1.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let t0 = Instant::now();
        let mut clock = BeatClock::new();
        clock.start_at(1000.0, t0);
        clock.reset();
        assert!(!clock.is_running());
        let tick = clock.sample_at(t0 + ms(100));
        assert_eq!(tick.elapsed_ms, 0.0);
        assert!(!tick.done);
    }

    #[test]
    fn test_zero_total_completes_immediately() {
        let t0 = Instant::now();
        let mut clock = BeatClock::new();
        clock.start_at(0.0, t0);
        assert!(clock.sample_at(t0).done);
    }
}
