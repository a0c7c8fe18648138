//! Time management utilities
//!
//! The simulation is driven by an external frame clock, so [`Timer`] and
//! [`IntervalTimer`] advance by the delta they are handed instead of reading
//! the wall clock. [`Stopwatch`] measures real elapsed time for profiling.

use std::time::{Duration, Instant};

/// Simulation clock advanced once per frame
#[derive(Debug, Clone, Default)]
pub struct Timer {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame of `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
    }

    /// Duration of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total simulated time in seconds
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per simulated second
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Fires once every `interval` seconds of accumulated time.
///
/// The accumulator resets to zero when it fires; any overshoot is dropped.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: f32,
    elapsed: f32,
}

impl IntervalTimer {
    /// Create a timer firing every `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Accumulate `delta_time`; returns true when the interval was reached
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Seconds accumulated since the timer last fired
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Simple stopwatch for measuring elapsed wall-clock time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_accumulates_frames() {
        let mut timer = Timer::new();
        timer.tick(0.25);
        timer.tick(0.25);
        assert_eq!(timer.frame_count(), 2);
        assert!((timer.total_time() - 0.5).abs() < 1e-6);
        assert!((timer.average_fps() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_interval_timer_fires_and_resets() {
        let mut spawn = IntervalTimer::new(0.5);
        assert!(!spawn.tick(0.2));
        assert!(!spawn.tick(0.2));
        assert!(spawn.tick(0.2));
        assert_eq!(spawn.elapsed(), 0.0);
        assert!(!spawn.tick(0.1));
    }
}
