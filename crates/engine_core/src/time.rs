//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Wall clock for the frame loop. The simulation reads timestamps from here in
/// milliseconds so gameplay code can be driven by explicit clocks in tests.
#[derive(Debug)]
pub struct Time {
    /// Time when the engine started.
    start_time: Instant,
    /// Total elapsed time since start, as of the last update.
    elapsed: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        self.elapsed = self.start_time.elapsed();
    }

    /// Total elapsed time in milliseconds, the unit the performance governor works in.
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_starts_at_zero_and_only_grows() {
        let mut time = Time::new();
        assert_eq!(time.elapsed_millis(), 0.0);
        time.update();
        let first = time.elapsed_millis();
        time.update();
        assert!(time.elapsed_millis() >= first);
    }
}
