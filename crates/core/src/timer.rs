//! Frame clock producing the per-frame time step (`tpf`).

use std::time::{Duration, Instant};

/// Upper bound applied to a single measured frame delta, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Measures the time between frames for the host's loop.
///
/// Each call to [`FrameClock::tick`] returns the seconds elapsed since the
/// previous tick, clamped to `max_delta` so that a stalled frame (debugger,
/// window drag) does not turn into one huge rotation step.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    max_delta: f32,
    frames: u64,
}

impl FrameClock {
    /// Create a new clock, starting from now.
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    /// Create a clock with a custom clamp for individual deltas.
    pub fn with_max_delta(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            max_delta: max_delta.max(0.0),
            frames: 0,
        }
    }

    /// Advance one frame and return its time step in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.frames += 1;
        clamp_delta(delta, self.max_delta)
    }

    /// Number of ticks since creation or the last reset.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total elapsed time since creation or the last reset.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the last tick, without advancing the clock.
    pub fn since_last_tick(&self) -> Duration {
        self.last_tick.elapsed()
    }

    /// The clamp applied to individual deltas.
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Reset the clock to the current time.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
        self.frames = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_delta(delta: Duration, max_delta: f32) -> f32 {
    delta.as_secs_f32().min(max_delta)
}
