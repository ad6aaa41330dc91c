//! Fixed timestep frame clock
//!
//! Turns variable frame deltas into a whole number of simulation ticks plus
//! an interpolation fraction for rendering between the last two ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted; longer gaps (tab switches) are cut short
const MAX_FRAME_DT: f32 = 0.25;
/// Frames averaged for the FPS estimate
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator: f32,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Account for `dt` seconds of frame time at absolute `time` (ms)
    ///
    /// Returns the number of simulation ticks to run this frame.
    pub fn advance(&mut self, dt: f32, time: f64) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 * 1000.0 / elapsed).round() as u32;
            }
        }

        substeps
    }

    /// Fraction of a tick elapsed since the last one, in [0, 1)
    pub fn interpolation(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Drop any pending partial tick
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
