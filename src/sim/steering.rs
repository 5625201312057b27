//! Per-fish steering
//!
//! Each tick a fish starts from its current heading and accumulates nudges:
//! flee, borders, obstacles, then separation / alignment / cohesion from its
//! ranked neighbors. The blended heading is turn-capped and scaled to the
//! distance covered this tick.

use glam::Vec2;

use super::neighbors::Neighbors;
use super::params::SteeringParams;
use super::state::{Bounds, Fish};
use super::vector::VectorExt;

/// What a fish can see this tick
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub bounds: Bounds,
    pub obstacles: &'a [Vec2],
    pub neighbors: &'a Neighbors,
}

/// Compute this tick's head displacement for `fish`.
///
/// Only the fish's own flee timer is updated; positions are left untouched so
/// the caller can commit every fish's move at once.
pub fn steer(fish: &mut Fish, delta: f32, env: &Surroundings, params: &SteeringParams) -> Vec2 {
    let distance = delta * fish.speed(params);
    let position = fish.position();
    let direction = fish.direction();
    let mut target = direction;

    if let Some(flee) = fish.fleeing() {
        if let Some(away) = (position - flee.from).try_resize(distance * params.flee_factor) {
            target += away;
        }
    }
    fish.decay_flee(delta);

    target += border_push(position, env.bounds, params.dodge_radius, distance);

    let obstacle_sq = params.obstacle_radius * params.obstacle_radius;
    for &obstacle in env.obstacles {
        let away = position - obstacle;
        if away.length_squared() < obstacle_sq {
            if let Some(push) = away.try_resize(params.obstacle_factor * distance) {
                target += push;
            }
        }
    }

    target += flocking(position, env.neighbors, distance, params);

    let adjust = turn_overshoot(direction.signed_angle(target), params.max_turn_angle);
    let heading = target.try_resize(distance).unwrap_or_else(|| {
        // Nudges cancelled the heading out: keep going straight
        direction.resize(distance)
    });
    heading.rotated(-adjust)
}

/// Push back toward the interior, one axis at a time
fn border_push(position: Vec2, bounds: Bounds, dodge_radius: f32, distance: f32) -> Vec2 {
    let mut push = Vec2::ZERO;
    if position.y < dodge_radius {
        push.y += distance;
    }
    if position.y > bounds.max.y - dodge_radius {
        push.y -= distance;
    }
    if position.x < dodge_radius {
        push.x += distance;
    }
    if position.x > bounds.max.x - dodge_radius {
        push.x -= distance;
    }
    push
}

/// Separation, alignment and cohesion, weaker for farther-ranked neighbors
fn flocking(position: Vec2, neighbors: &Neighbors, distance: f32, params: &SteeringParams) -> Vec2 {
    let mut steer = Vec2::ZERO;
    let total = neighbors.len() as f32;
    let dodge_sq = params.dodge_radius * params.dodge_radius;
    let align_sq = params.align_radius * params.align_radius;
    let approach_sq = params.approach_radius * params.approach_radius;

    for (rank, neighbor) in neighbors.others() {
        let toward = neighbor.view.position - position;
        let dist_sq = toward.length_squared();
        if dist_sq < f32::EPSILON {
            continue;
        }
        let increment = distance * (1.0 - rank as f32 / total);
        let nudge = if dist_sq < dodge_sq {
            (-toward).try_resize(params.dodge_factor * increment)
        } else if dist_sq < align_sq {
            neighbor
                .view
                .direction
                .try_resize(params.align_factor * increment)
        } else if dist_sq < approach_sq {
            toward.try_resize(params.approach_factor * increment)
        } else {
            None
        };
        if let Some(nudge) = nudge {
            steer += nudge;
        }
    }
    steer
}

/// How far `angle` exceeds the turn cap, signed; 0 when within the cap
#[inline]
fn turn_overshoot(angle: f32, max_turn: f32) -> f32 {
    if angle > max_turn {
        angle - max_turn
    } else if angle < -max_turn {
        angle + max_turn
    } else {
        0.0
    }
}
