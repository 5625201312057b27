//! Simulation tick
//!
//! A tick runs in two phases: every fish steers against a snapshot taken at
//! the start of the tick, then all head moves are committed together. The
//! outcome therefore does not depend on the order fish are stored in.

use glam::Vec2;

use super::SimError;
use super::neighbors::rank_neighbors;
use super::state::{Bounds, FishId, School};
use super::steering::{Surroundings, steer};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Simulation area, `(0, 0)` to `bounds.max`
    pub bounds: Bounds,
    /// Points to steer around this tick (e.g. the pointer)
    pub obstacles: Vec<Vec2>,
    /// Threats registered since the last tick (e.g. clicks)
    pub threats: Vec<Vec2>,
}

/// Advance every fish by `delta` milliseconds
pub fn tick(school: &mut School, input: &TickInput, delta: f32) {
    let delta = sanitize_delta(delta);

    for &threat in &input.threats {
        school.flee_from(threat);
    }

    let params = *school.params();
    let views = school.views();
    let displacements: Vec<Vec2> = school
        .fishes_mut()
        .iter_mut()
        .enumerate()
        .map(|(i, fish)| {
            let neighbors = rank_neighbors(&views, i, params.neighbor_count);
            let env = Surroundings {
                bounds: input.bounds,
                obstacles: &input.obstacles,
                neighbors: &neighbors,
            };
            steer(fish, delta, &env, &params)
        })
        .collect();

    for (fish, displacement) in school.fishes_mut().iter_mut().zip(displacements) {
        debug_assert!(
            displacement.is_finite(),
            "{:?} produced a non-finite move",
            fish.id()
        );
        let head = fish.position() + displacement;
        fish.set_head_position(head);
    }

    school.time_ticks += 1;
    school.elapsed_ms += delta as f64;
}

/// Advance a single fish by `delta` milliseconds, the rest of the school
/// staying where it is. Threats in `input` are offered to this fish only.
pub fn move_fish(
    school: &mut School,
    id: FishId,
    input: &TickInput,
    delta: f32,
) -> Result<(), SimError> {
    let delta = sanitize_delta(delta);
    let index = school.index_of(id).ok_or(SimError::UnknownFish(id))?;
    let params = *school.params();
    let views = school.views();
    let neighbors = rank_neighbors(&views, index, params.neighbor_count);

    let fish = &mut school.fishes_mut()[index];
    for &threat in &input.threats {
        fish.flee_from(threat, &params);
    }
    let env = Surroundings {
        bounds: input.bounds,
        obstacles: &input.obstacles,
        neighbors: &neighbors,
    };
    let displacement = steer(fish, delta, &env, &params);
    let head = fish.position() + displacement;
    fish.set_head_position(head);
    Ok(())
}

fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta >= 0.0 {
        delta
    } else {
        log::warn!("Ignoring invalid tick delta {}", delta);
        0.0
    }
}
