//! Browser bindings
//!
//! A thin `wasm-bindgen` facade: JavaScript owns the canvas, the
//! `requestAnimationFrame` loop and the input events, and reads chunk data
//! back through flat buffers.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::outline::{Side, body_outline, lateral_fin_anchor};
use crate::palette::FishColor;
use crate::platform::{FrameClock, drive_frame};
use crate::sim::{Bounds, School, SteeringParams, TickInput};

/// Chunks carrying a pair of lateral fins, head first
const FIN_CHUNKS: [usize; 2] = [3, 9];

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WasmSchool {
    school: School,
    clock: FrameClock,
    input: TickInput,
}

#[wasm_bindgen]
impl WasmSchool {
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, seed: u32, width: f32, height: f32) -> Result<WasmSchool, JsError> {
        let bounds = Bounds::new(width, height)?;
        let school = School::populate(seed as u64, SteeringParams::default(), count, bounds);
        Ok(WasmSchool {
            school,
            clock: FrameClock::default(),
            input: TickInput {
                bounds,
                ..Default::default()
            },
        })
    }

    /// Advance to the animation-frame timestamp `now_ms`; false when no
    /// tick ran (first frame, or first frame after the page was hidden)
    pub fn frame(&mut self, now_ms: f64) -> bool {
        drive_frame(&mut self.clock, &mut self.school, &mut self.input, now_ms)
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        self.input.bounds = Bounds::new(width, height)?;
        Ok(())
    }

    /// Pointer position, avoided like an obstacle
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.input.obstacles.clear();
        self.input.obstacles.push(Vec2::new(x, y));
    }

    pub fn clear_pointer(&mut self) {
        self.input.obstacles.clear();
    }

    /// Queue a threat for the next frame
    pub fn flee_from(&mut self, x: f32, y: f32) {
        self.input.threats.push(Vec2::new(x, y));
    }

    /// Call when the page is hidden so the next frame restarts the clock
    pub fn visibility_hidden(&mut self) {
        self.clock.reset();
    }

    pub fn count(&self) -> usize {
        self.school.len()
    }

    /// Chunks per fish (every fish shares the same profile)
    pub fn chunks_per_fish(&self) -> usize {
        self.school
            .fishes()
            .first()
            .map(|f| f.chunks().len())
            .unwrap_or(0)
    }

    /// `x, y, radius` for every chunk of every fish, fish in id order
    pub fn chunk_buffer(&self) -> Vec<f32> {
        self.school
            .fishes()
            .iter()
            .flat_map(|f| f.chunks())
            .flat_map(|c| [c.position.x, c.position.y, c.radius()])
            .collect()
    }

    /// One color tag per fish, see `FishColor::as_u8`
    pub fn colors(&self) -> Vec<u8> {
        self.school
            .fishes()
            .iter()
            .map(|f| f.color().as_u8())
            .collect()
    }

    /// Silhouette of the fish at `index` as flat `x, y` pairs; empty when out
    /// of range
    pub fn outline(&self, index: usize) -> Vec<f32> {
        self.school
            .fishes()
            .get(index)
            .map(|f| body_outline(f.chunks()))
            .unwrap_or_default()
            .into_iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// Lateral fin anchors, `x, y` pairs: for every fish, left then right
    /// at each fin chunk
    pub fn fin_buffer(&self) -> Vec<f32> {
        let mut buffer = Vec::new();
        for fish in self.school.fishes() {
            for at in FIN_CHUNKS {
                for side in [Side::Left, Side::Right] {
                    let anchor =
                        lateral_fin_anchor(fish.chunks(), at, side).unwrap_or(fish.position());
                    buffer.extend([anchor.x, anchor.y]);
                }
            }
        }
        buffer
    }
}

/// Body fill for a color tag
#[wasm_bindgen]
pub fn body_hex(tag: u8) -> Option<String> {
    FishColor::from_u8(tag).map(|c| c.body_hex().to_string())
}

/// Fin fill for a color tag
#[wasm_bindgen]
pub fn fin_hex(tag: u8) -> Option<String> {
    FishColor::from_u8(tag).map(|c| c.fin_hex().to_string())
}

/// Color tag for a name such as `"coral"`
#[wasm_bindgen]
pub fn color_tag(name: &str) -> Result<u8, JsError> {
    Ok(name.parse::<FishColor>()?.as_u8())
}
