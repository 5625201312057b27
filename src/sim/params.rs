//! Steering tunables
//!
//! Defaults come from `crate::consts`; settings files may override them.

use serde::{Deserialize, Serialize};

use crate::consts::*;

const MAX_RADIUS: f32 = 1_000.0;
const MAX_FACTOR: f32 = 100.0;
const MAX_NEIGHBORS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Cruising speed, world units per ms
    pub base_speed: f32,
    pub dodge_radius: f32,
    pub align_radius: f32,
    pub approach_radius: f32,
    pub dodge_factor: f32,
    pub align_factor: f32,
    pub approach_factor: f32,
    pub obstacle_radius: f32,
    pub obstacle_factor: f32,
    /// Radians per tick
    pub max_turn_angle: f32,
    pub flee_radius: f32,
    pub flee_duration_ms: f32,
    pub flee_factor: f32,
    pub flee_max_boost: f32,
    /// Ranked neighbors per fish, self included
    pub neighbor_count: usize,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            dodge_radius: DODGE_RADIUS,
            align_radius: ALIGN_RADIUS,
            approach_radius: APPROACH_RADIUS,
            dodge_factor: DODGE_FACTOR,
            align_factor: ALIGN_FACTOR,
            approach_factor: APPROACH_FACTOR,
            obstacle_radius: OBSTACLE_RADIUS,
            obstacle_factor: OBSTACLE_FACTOR,
            max_turn_angle: MAX_TURN_ANGLE,
            flee_radius: FLEE_RADIUS,
            flee_duration_ms: FLEE_DURATION_MS,
            flee_factor: FLEE_FACTOR,
            flee_max_boost: FLEE_MAX_BOOST,
            neighbor_count: NEIGHBOR_COUNT,
        }
    }
}

impl SteeringParams {
    /// Clamp every field to a usable range, falling back to the default for
    /// non-finite values. Band radii are forced into ascending order.
    pub fn sanitize(&mut self) {
        let d = Self::default();
        self.base_speed = clamp_finite(self.base_speed, 0.0, 1.0, d.base_speed);
        self.dodge_radius = clamp_finite(self.dodge_radius, 0.0, MAX_RADIUS, d.dodge_radius);
        self.align_radius = clamp_finite(
            self.align_radius,
            self.dodge_radius,
            MAX_RADIUS,
            d.align_radius.max(self.dodge_radius),
        );
        self.approach_radius = clamp_finite(
            self.approach_radius,
            self.align_radius,
            MAX_RADIUS,
            d.approach_radius.max(self.align_radius),
        );
        self.dodge_factor = clamp_finite(self.dodge_factor, 0.0, MAX_FACTOR, d.dodge_factor);
        self.align_factor = clamp_finite(self.align_factor, 0.0, MAX_FACTOR, d.align_factor);
        self.approach_factor =
            clamp_finite(self.approach_factor, 0.0, MAX_FACTOR, d.approach_factor);
        self.obstacle_radius =
            clamp_finite(self.obstacle_radius, 0.0, MAX_RADIUS, d.obstacle_radius);
        self.obstacle_factor =
            clamp_finite(self.obstacle_factor, 0.0, MAX_FACTOR, d.obstacle_factor);
        self.max_turn_angle = clamp_finite(
            self.max_turn_angle,
            0.0,
            std::f32::consts::PI,
            d.max_turn_angle,
        );
        self.flee_radius = clamp_finite(self.flee_radius, 0.0, MAX_RADIUS, d.flee_radius);
        // A zero duration would divide by zero in the speed boost
        self.flee_duration_ms =
            clamp_finite(self.flee_duration_ms, 1.0, 60_000.0, d.flee_duration_ms);
        self.flee_factor = clamp_finite(self.flee_factor, 0.0, MAX_FACTOR, d.flee_factor);
        self.flee_max_boost = clamp_finite(self.flee_max_boost, 0.0, 10.0, d.flee_max_boost);
        self.neighbor_count = self.neighbor_count.clamp(1, MAX_NEIGHBORS);
    }

    /// Speed multiplier for a flee with `remaining` ms left, in `[1, 1 + flee_max_boost]`
    #[inline]
    pub fn flee_boost(&self, remaining: f32) -> f32 {
        1.0 + self.flee_max_boost * (remaining / self.flee_duration_ms).clamp(0.0, 1.0)
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}
