//! Frame timing.
//!
//! [`FrameClock`] measures the real time between redraws and keeps a running
//! FPS estimate for diagnostics. A fixed delta can replace the measured one,
//! which is how the headless driver gets reproducible runs.
//!
//! # Example
//!
//! ```ignore
//! use nebula::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // once per redraw:
//! let delta = clock.tick();
//! scene.tick(delta);
//! ```

use std::time::{Duration, Instant};

/// Measures per-frame deltas.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Overrides the measured delta when set.
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Create a clock whose first delta is measured from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Clock that always reports `delta` seconds per frame.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.fixed_delta = Some(delta);
        clock
    }

    /// Mark a new frame and return the seconds elapsed since the previous one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta);
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Restart delta measurement from now, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_frame = now;
        self.fps_update_time = now;
        self.fps_frame_count = self.frame_count;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
