//! Fish School - flocking fish with jointed body chains
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vector math, body chains, steering, flee state)
//! - `outline`: Body silhouette geometry for renderers
//! - `palette`: Fish color tags
//! - `platform`: Frame clock and browser/native differences
//! - `settings`: Data-driven configuration

pub mod outline;
pub mod palette;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use palette::{FishColor, UnknownColor};
pub use settings::{Settings, SettingsError};

/// Simulation constants
///
/// Distances are in world units (the reference world is 100 units wide),
/// times are in milliseconds.
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed distance between two consecutive body chunks
    pub const NODE_DIST: f32 = 0.3;

    /// Body silhouette profile, head first, in units of `NODE_DIST`
    pub const RADII: [f32; 15] = [
        1.36, 1.68, 1.74, 1.7, 1.66, 1.54, 1.28, 1.2, 1.02, 0.76, 0.68, 0.64, 0.38, 0.3, 0.0,
    ];

    /// Cruising speed (world units per ms): one body length per second
    pub const BASE_SPEED: f32 = NODE_DIST * RADII.len() as f32 / 1000.0;

    /// Below this distance neighbors repel each other (separation)
    pub const DODGE_RADIUS: f32 = 15.0 * NODE_DIST;
    /// Below this distance neighbors share heading (alignment)
    pub const ALIGN_RADIUS: f32 = 1.2 * DODGE_RADIUS;
    /// Below this distance neighbors attract (cohesion)
    pub const APPROACH_RADIUS: f32 = 2.0 * DODGE_RADIUS;

    pub const DODGE_FACTOR: f32 = 1.0;
    pub const ALIGN_FACTOR: f32 = 1.0;
    pub const APPROACH_FACTOR: f32 = 1.0;

    /// Point obstacles (pointer) closer than this push the fish away
    pub const OBSTACLE_RADIUS: f32 = 2.0 * DODGE_RADIUS;
    pub const OBSTACLE_FACTOR: f32 = 4.0;

    /// Maximum heading change per tick (radians)
    pub const MAX_TURN_ANGLE: f32 = PI / 8.0;

    /// Threats closer than this start a flee
    pub const FLEE_RADIUS: f32 = 4.0 * DODGE_RADIUS;
    /// How long a flee lasts (ms)
    pub const FLEE_DURATION_MS: f32 = 1500.0;
    pub const FLEE_FACTOR: f32 = 4.0;
    /// Extra speed multiplier at the start of a flee (decays to 0)
    pub const FLEE_MAX_BOOST: f32 = 2.0;

    /// Neighbors considered by the flocking rules (self included)
    pub const NEIGHBOR_COUNT: usize = 6;

    /// Largest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_MS: f32 = 250.0;

    /// Largest world width or height. Beyond this f32 positions are too
    /// coarse to hold a `NODE_DIST` link.
    pub const MAX_WORLD_EXTENT: f32 = 1.0e5;
}
