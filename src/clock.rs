use std::time::Instant;

/// Source of a monotonic millisecond counter.
pub trait ClockSource {
    fn now_millis(&self) -> u64;
}

/// Milliseconds since the clock was created.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockSource for SystemClock {
    fn now_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Previous and current frame timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    previous: u64,
    current: u64,
    max_elapsed: f64,
}

impl FrameClock {
    /// `max_elapsed` caps a single frame's step, in seconds.
    pub fn new(now_millis: u64, max_elapsed: f64) -> Self {
        Self {
            previous: now_millis,
            current: now_millis,
            max_elapsed,
        }
    }

    /// Records a new sample and returns the seconds since the last one.
    pub fn tick(&mut self, now_millis: u64) -> f64 {
        self.previous = self.current;
        self.current = now_millis;
        self.elapsed()
    }

    /// Forgets the previous sample, e.g. after the window was suspended.
    pub fn restart(&mut self, now_millis: u64) {
        self.previous = now_millis;
        self.current = now_millis;
    }

    pub fn elapsed(&self) -> f64 {
        let millis = self.current.saturating_sub(self.previous);
        (millis as f64 / 1000.0).min(self.max_elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_in_seconds() {
        let mut clock = FrameClock::new(1000, 0.1);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.tick(1016), 0.016);
        assert_eq!(clock.tick(1050), 0.034);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut clock = FrameClock::new(0, 0.1);
        assert_eq!(clock.tick(5000), 0.1);
        assert_eq!(clock.tick(5020), 0.02);
        clock.restart(9000);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.tick(9010), 0.01);
    }

    #[test]
    fn test_backwards_clock_yields_zero() {
        let mut clock = FrameClock::new(500, 0.1);
        assert_eq!(clock.tick(400), 0.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
