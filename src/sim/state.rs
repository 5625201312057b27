//! Simulation state: fish, their flee state, and the school that owns them
//!
//! Everything here is serializable so a school can be snapshotted.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize};

use super::SimError;
use super::chain::{BodyChain, Chunk};
use super::params::SteeringParams;
use crate::consts::{MAX_WORLD_EXTENT, NODE_DIST, RADII};
use crate::palette::FishColor;

/// Rectangular world from `(0, 0)` to `max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Result<Self, SimError> {
        let valid = |extent: f32| extent > 0.0 && extent <= MAX_WORLD_EXTENT;
        if !(valid(width) && valid(height)) {
            return Err(SimError::InvalidBounds { width, height });
        }
        Ok(Self {
            max: Vec2::new(width, height),
        })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(Vec2::ZERO).all() && point.cmple(self.max).all()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            max: Vec2::splat(100.0),
        }
    }
}

/// Stable fish handle, allocated in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FishId(pub u32);

/// Transient threat avoidance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleeState {
    /// Where the threat appeared
    pub from: Vec2,
    /// Milliseconds left; the state is dropped once this reaches 0
    pub remaining: f32,
}

/// A single fish: a body chain plus its color and optional flee state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fish {
    id: FishId,
    body: BodyChain,
    color: FishColor,
    fleeing: Option<FleeState>,
}

impl Fish {
    /// Build a fish with the reference 15-chunk silhouette
    pub fn new(
        id: FishId,
        position: Vec2,
        orientation: Vec2,
        color: FishColor,
    ) -> Result<Self, SimError> {
        let radii: Vec<f32> = RADII.iter().map(|r| r * NODE_DIST).collect();
        Self::with_radii(id, position, orientation, &radii, color)
    }

    /// Build a fish with a custom radius profile (at least 2 chunks)
    pub fn with_radii(
        id: FishId,
        position: Vec2,
        orientation: Vec2,
        radii: &[f32],
        color: FishColor,
    ) -> Result<Self, SimError> {
        Ok(Self {
            id,
            body: BodyChain::new(position, orientation, radii, NODE_DIST)?,
            color,
            fleeing: None,
        })
    }

    /// Uniformly random position, heading and color inside `bounds`
    pub fn random<R: Rng + ?Sized>(id: FishId, bounds: Bounds, rng: &mut R) -> Self {
        let position = Vec2::new(
            rng.random::<f32>() * bounds.width(),
            rng.random::<f32>() * bounds.height(),
        );
        let alpha = rng.random::<f32>() * std::f32::consts::TAU;
        let orientation = Vec2::from_angle(alpha);
        let color = FishColor::random(rng);
        let radii: Vec<f32> = RADII.iter().map(|r| r * NODE_DIST).collect();
        Self {
            id,
            body: match BodyChain::new(position, orientation, &radii, NODE_DIST) {
                Ok(body) => body,
                // from_angle always yields a unit vector and RADII is valid
                Err(e) => unreachable!("reference body rejected: {e}"),
            },
            color,
            fleeing: None,
        }
    }

    #[inline]
    pub fn id(&self) -> FishId {
        self.id
    }

    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        self.body.chunks()
    }

    #[inline]
    pub fn body(&self) -> &BodyChain {
        &self.body
    }

    #[inline]
    pub fn color(&self) -> FishColor {
        self.color
    }

    #[inline]
    pub fn fleeing(&self) -> Option<&FleeState> {
        self.fleeing.as_ref()
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.head()
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.body.direction()
    }

    /// Current speed, boosted while fleeing
    pub fn speed(&self, params: &SteeringParams) -> f32 {
        let boost = self
            .fleeing
            .map(|f| params.flee_boost(f.remaining))
            .unwrap_or(1.0);
        params.base_speed * boost
    }

    /// Move the head, dragging the body after it
    pub fn set_head_position(&mut self, head: Vec2) {
        self.body.set_head_position(head);
    }

    /// Start (or restart) fleeing if `threat` is strictly inside the trigger radius
    pub fn flee_from(&mut self, threat: Vec2, params: &SteeringParams) -> bool {
        let radius_sq = params.flee_radius * params.flee_radius;
        if self.position().distance_squared(threat) < radius_sq {
            self.fleeing = Some(FleeState {
                from: threat,
                remaining: params.flee_duration_ms,
            });
            true
        } else {
            false
        }
    }

    /// Count the flee timer down; clears the state when it expires
    pub(crate) fn decay_flee(&mut self, delta: f32) {
        if let Some(flee) = &mut self.fleeing {
            flee.remaining -= delta;
            if flee.remaining <= 0.0 {
                log::debug!("{:?} stopped fleeing", self.id);
                self.fleeing = None;
            }
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator on the next stream, so every draw is reproducible
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// All fish of one simulation
///
/// Append-only: fish live as long as the school. Each school is independent,
/// so several can run side by side in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Always sanitized, including when restored from a snapshot
    #[serde(deserialize_with = "sanitized_params")]
    params: SteeringParams,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated milliseconds
    pub elapsed_ms: f64,
    /// Fish sorted by id
    fishes: Vec<Fish>,
    next_id: u32,
}

impl School {
    pub fn new(seed: u64, params: SteeringParams) -> Self {
        let mut params = params;
        params.sanitize();
        Self {
            seed,
            rng_state: RngState::new(seed),
            params,
            time_ticks: 0,
            elapsed_ms: 0.0,
            fishes: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a school of `count` random fish
    pub fn populate(seed: u64, params: SteeringParams, count: usize, bounds: Bounds) -> Self {
        let mut school = Self::new(seed, params);
        for _ in 0..count {
            school.spawn_random(bounds);
        }
        log::info!(
            "School seeded with {} fish in {}x{} (seed {})",
            count,
            bounds.width(),
            bounds.height(),
            seed
        );
        school
    }

    fn next_fish_id(&mut self) -> FishId {
        let id = FishId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a fish at `position` heading along `orientation`
    pub fn spawn(
        &mut self,
        position: Vec2,
        orientation: Vec2,
        color: FishColor,
    ) -> Result<FishId, SimError> {
        let id = FishId(self.next_id);
        let fish = Fish::new(id, position, orientation, color)?;
        self.next_id += 1;
        self.fishes.push(fish);
        Ok(id)
    }

    /// Register a fish at a random position, heading and color
    pub fn spawn_random(&mut self, bounds: Bounds) -> FishId {
        let id = self.next_fish_id();
        let mut rng = self.rng_state.next_rng();
        self.fishes.push(Fish::random(id, bounds, &mut rng));
        id
    }

    #[inline]
    pub fn params(&self) -> &SteeringParams {
        &self.params
    }

    #[inline]
    pub fn fishes(&self) -> &[Fish] {
        &self.fishes
    }

    #[inline]
    pub(crate) fn fishes_mut(&mut self) -> &mut [Fish] {
        &mut self.fishes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fishes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fishes.is_empty()
    }

    /// Index of a fish in `fishes()`; ids are allocated in order
    pub fn index_of(&self, id: FishId) -> Option<usize> {
        self.fishes.binary_search_by_key(&id, |f| f.id).ok()
    }

    pub fn fish(&self, id: FishId) -> Result<&Fish, SimError> {
        self.index_of(id)
            .map(|i| &self.fishes[i])
            .ok_or(SimError::UnknownFish(id))
    }

    /// Offer a threat to every fish; returns how many started fleeing
    pub fn flee_from(&mut self, threat: Vec2) -> usize {
        let params = self.params;
        let triggered = self
            .fishes
            .iter_mut()
            .map(|f| f.flee_from(threat, &params))
            .filter(|&scared| scared)
            .count();
        log::debug!(
            "Threat at ({:.2}, {:.2}) scared {} fish",
            threat.x,
            threat.y,
            triggered
        );
        triggered
    }
}

fn sanitized_params<'de, D>(deserializer: D) -> Result<SteeringParams, D::Error>
where
    D: Deserializer<'de>,
{
    let mut params = SteeringParams::deserialize(deserializer)?;
    params.sanitize();
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fish_at(position: Vec2) -> Fish {
        Fish::new(FishId(1), position, Vec2::X, FishColor::Coral).unwrap()
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(100.0, 60.0).is_ok());
        assert!(Bounds::new(0.0, 60.0).is_err());
        assert!(Bounds::new(100.0, f32::NAN).is_err());
        assert!(Bounds::new(f32::INFINITY, 60.0).is_err());
        assert!(Bounds::new(MAX_WORLD_EXTENT, MAX_WORLD_EXTENT).is_ok());
        let b = Bounds::default();
        assert!(b.contains(Vec2::new(50.0, 100.0)));
        assert!(!b.contains(Vec2::new(-1.0, 50.0)));
    }

    #[test]
    fn test_bounds_reject_huge_worlds() {
        assert_eq!(
            Bounds::new(1.0e8, 1.0e8),
            Err(SimError::InvalidBounds {
                width: 1.0e8,
                height: 1.0e8
            })
        );
        assert!(Bounds::new(100.0, MAX_WORLD_EXTENT * 2.0).is_err());
    }

    #[test]
    fn test_largest_world_still_ticks() {
        let bounds = Bounds::new(MAX_WORLD_EXTENT, MAX_WORLD_EXTENT).unwrap();
        let mut school = School::populate(1, SteeringParams::default(), 3, bounds);
        let input = crate::sim::TickInput {
            bounds,
            ..Default::default()
        };
        for _ in 0..10 {
            crate::sim::tick(&mut school, &input, 16.0);
        }
        for fish in school.fishes() {
            assert!(fish.position().is_finite());
            assert!(fish.direction().length() > 0.0);
        }
    }

    #[test]
    fn test_fish_defaults() {
        let fish = fish_at(Vec2::new(10.0, 10.0));
        assert_eq!(fish.chunks().len(), RADII.len());
        assert_eq!(fish.position(), Vec2::new(10.0, 10.0));
        assert!(fish.fleeing().is_none());
        let params = SteeringParams::default();
        assert_eq!(fish.speed(&params), params.base_speed);
        assert_eq!(fish.chunks().last().unwrap().radius(), 0.0);
    }

    #[test]
    fn test_custom_radii_rejects_single_chunk() {
        let err = Fish::with_radii(FishId(1), Vec2::ZERO, Vec2::X, &[1.0], FishColor::Sage)
            .unwrap_err();
        assert_eq!(err, SimError::ChainTooShort(1));
    }

    #[test]
    fn test_flee_trigger_is_strict() {
        let params = SteeringParams::default();
        let mut fish = fish_at(Vec2::new(50.0, 50.0));

        // Exactly on the trigger radius: no flee
        let edge = Vec2::new(50.0 + params.flee_radius, 50.0);
        assert!(!fish.flee_from(edge, &params));
        assert!(fish.fleeing().is_none());

        let inside = Vec2::new(50.0 + params.flee_radius - 0.01, 50.0);
        assert!(fish.flee_from(inside, &params));
        let flee = fish.fleeing().unwrap();
        assert_eq!(flee.from, inside);
        assert_eq!(flee.remaining, params.flee_duration_ms);
    }

    #[test]
    fn test_flee_retrigger_refreshes_timer_and_origin() {
        let params = SteeringParams::default();
        let mut fish = fish_at(Vec2::new(50.0, 50.0));
        fish.flee_from(Vec2::new(51.0, 50.0), &params);
        fish.decay_flee(1000.0);
        assert_eq!(fish.fleeing().unwrap().remaining, 500.0);

        fish.flee_from(Vec2::new(49.0, 50.0), &params);
        let flee = fish.fleeing().unwrap();
        assert_eq!(flee.from, Vec2::new(49.0, 50.0));
        assert_eq!(flee.remaining, params.flee_duration_ms);
    }

    #[test]
    fn test_flee_decay_and_speed_boost() {
        let params = SteeringParams::default();
        let mut fish = fish_at(Vec2::new(50.0, 50.0));
        fish.flee_from(Vec2::new(52.0, 50.0), &params);
        assert_eq!(fish.speed(&params), params.base_speed * 3.0);

        let mut last = fish.fleeing().unwrap().remaining;
        while let Some(flee) = fish.fleeing().copied() {
            let boost = fish.speed(&params) / params.base_speed;
            assert!((1.0..=3.0).contains(&boost));
            assert!(flee.remaining <= last);
            last = flee.remaining;
            fish.decay_flee(100.0);
        }
        assert_eq!(fish.speed(&params), params.base_speed);
    }

    #[test]
    fn test_school_ids_and_lookup() {
        let mut school = School::new(7, SteeringParams::default());
        let a = school
            .spawn(Vec2::new(1.0, 1.0), Vec2::X, FishColor::Coral)
            .unwrap();
        let b = school.spawn_random(Bounds::default());
        assert!(a < b);
        assert_eq!(school.len(), 2);
        assert_eq!(school.fish(b).unwrap().id(), b);
        assert_eq!(
            school.fish(FishId(99)).unwrap_err(),
            SimError::UnknownFish(FishId(99))
        );
    }

    #[test]
    fn test_failed_spawn_does_not_consume_id() {
        let mut school = School::new(7, SteeringParams::default());
        assert!(school.spawn(Vec2::ZERO, Vec2::ZERO, FishColor::Slate).is_err());
        let id = school.spawn(Vec2::ZERO, Vec2::Y, FishColor::Slate).unwrap();
        assert_eq!(id, FishId(1));
        assert!(!school.is_empty());
    }

    #[test]
    fn test_random_spawns_are_reproducible() {
        let bounds = Bounds::new(100.0, 60.0).unwrap();
        let a = School::populate(42, SteeringParams::default(), 20, bounds);
        let b = School::populate(42, SteeringParams::default(), 20, bounds);
        for (fa, fb) in a.fishes().iter().zip(b.fishes()) {
            assert_eq!(fa.position(), fb.position());
            assert_eq!(fa.color(), fb.color());
            assert!(bounds.contains(fa.position()));
        }
        let c = School::populate(43, SteeringParams::default(), 20, bounds);
        assert_ne!(a.fishes()[0].position(), c.fishes()[0].position());
    }

    #[test]
    fn test_school_flee_broadcast() {
        let mut school = School::new(1, SteeringParams::default());
        school.spawn(Vec2::new(10.0, 10.0), Vec2::X, FishColor::Coral).unwrap();
        school.spawn(Vec2::new(90.0, 90.0), Vec2::X, FishColor::Sage).unwrap();
        assert_eq!(school.flee_from(Vec2::new(12.0, 10.0)), 1);
        assert!(school.fishes()[0].fleeing().is_some());
        assert!(school.fishes()[1].fleeing().is_none());
    }

    #[test]
    fn test_params_stay_sanitized() {
        let raw = SteeringParams {
            flee_duration_ms: 0.0,
            base_speed: f32::NAN,
            ..Default::default()
        };
        let school = School::new(1, raw);
        assert_eq!(school.params().flee_duration_ms, 1.0);
        assert_eq!(school.params().base_speed, crate::consts::BASE_SPEED);

        // A hand-edited snapshot goes through the same clamping
        let mut json: serde_json::Value = serde_json::to_value(&school).unwrap();
        json["params"]["flee_duration_ms"] = serde_json::json!(0.0);
        json["params"]["neighbor_count"] = serde_json::json!(0);
        let mut restored: School = serde_json::from_value(json).unwrap();
        assert_eq!(restored.params().flee_duration_ms, 1.0);
        assert_eq!(restored.params().neighbor_count, 1);

        // A zero-length flee no longer turns the boost into NaN
        let id = restored
            .spawn(Vec2::new(50.0, 50.0), Vec2::X, FishColor::Coral)
            .unwrap();
        restored.flee_from(Vec2::new(51.0, 50.0));
        let speed = restored.fish(id).unwrap().speed(restored.params());
        assert!(speed.is_finite());
    }
}
