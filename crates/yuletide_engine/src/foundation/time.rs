//! Frame clocks
//!
//! A clock hands out the elapsed time (seconds since the scene started) for
//! each rendered frame. Values are monotonically non-decreasing.

use std::time::Instant;

/// Source of per-frame elapsed time
pub trait Clock {
    /// Produce the elapsed time for the next frame, in seconds
    fn tick(&mut self) -> f32;

    /// Elapsed time reported by the most recent tick
    fn elapsed(&self) -> f32;

    /// Number of frames ticked so far
    fn frame_count(&self) -> u64;
}

/// Deterministic clock advancing a fixed step per frame
///
/// The first tick reports `0.0`. Time is derived from the frame index rather
/// than accumulated, so long runs do not drift.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f64,
    elapsed: f32,
    frame_count: u64,
}

impl FixedStepClock {
    /// Create a clock that advances `step` seconds per frame
    pub fn new(step: f32) -> Self {
        Self {
            step: f64::from(step.max(0.0)),
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Create a clock for a target frame rate
    pub fn from_fps(fps: f32) -> Self {
        if fps > 0.0 {
            Self::new(1.0 / fps)
        } else {
            Self::new(0.0)
        }
    }

    /// Seconds per frame
    pub fn step(&self) -> f32 {
        self.step as f32
    }
}

impl Clock for FixedStepClock {
    fn tick(&mut self) -> f32 {
        self.elapsed = (self.frame_count as f64 * self.step) as f32;
        self.frame_count += 1;
        self.elapsed
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Wall-clock source measured from construction
pub struct RealTimeClock {
    start: Instant,
    elapsed: f32,
    frame_count: u64,
}

impl Default for RealTimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RealTimeClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Average frames per second since the clock started
    pub fn average_fps(&self) -> f32 {
        if self.elapsed > 0.0 {
            self.frame_count as f32 / self.elapsed
        } else {
            0.0
        }
    }
}

impl Clock for RealTimeClock {
    fn tick(&mut self) -> f32 {
        // Instant is monotonic, the max guards against f32 rounding only
        self.elapsed = self.start.elapsed().as_secs_f32().max(self.elapsed);
        self.frame_count += 1;
        self.elapsed
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
