//! Time management utilities
//!
//! Everything here runs on simulation time: the clocks only move when the
//! frame pipeline feeds them a delta, so pausing the game freezes them.

/// Accumulated simulation time
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    total_time: f32,
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timer by one frame
    pub fn update(&mut self, delta_time: f32) {
        self.total_time += delta_time;
    }

    /// Get the total simulated time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
}

/// Stopwatch measuring simulated time since it was last restarted
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    elapsed: f32,
}

impl Stopwatch {
    /// Create a new stopwatch at zero
    pub fn start_new() -> Self {
        Self::default()
    }

    /// Go back to zero
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Feed a frame delta into the stopwatch
    pub fn tick(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
    }

    /// Get the elapsed time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
