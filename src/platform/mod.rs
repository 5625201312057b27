//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame time (animation-frame timestamps to tick deltas)
//! - Visibility (a hidden tab must not produce one giant tick)

use crate::consts::MAX_FRAME_MS;
use crate::sim::{School, TickInput, tick};

/// Turns absolute frame timestamps into per-tick deltas.
///
/// The first frame after construction or [`FrameClock::reset`] only records a
/// baseline and yields no delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_delta_ms: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_MS)
    }
}

impl FrameClock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last_ms: None,
            max_delta_ms: max_delta_ms.max(0.0),
        }
    }

    /// Record a frame at `now_ms`; returns the elapsed time to simulate
    pub fn frame(&mut self, now_ms: f64) -> Option<f32> {
        let last = self.last_ms.replace(now_ms)?;
        let elapsed = (now_ms - last).max(0.0) as f32;
        if elapsed > self.max_delta_ms {
            log::debug!(
                "Frame gap of {:.1} ms clamped to {:.1} ms",
                elapsed,
                self.max_delta_ms
            );
            return Some(self.max_delta_ms);
        }
        Some(elapsed)
    }

    /// Forget the baseline, e.g. when the page becomes hidden
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Run one animation frame: tick `school` if the clock yields a delta.
///
/// Threats in `input` are one-shot. They are consumed by the tick that sees
/// them and stay queued across frames that do not tick.
pub fn drive_frame(
    clock: &mut FrameClock,
    school: &mut School,
    input: &mut TickInput,
    now_ms: f64,
) -> bool {
    let Some(delta) = clock.frame(now_ms) else {
        return false;
    };
    tick(school, input, delta);
    input.threats.clear();
    true
}
