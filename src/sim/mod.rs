//! Deterministic simulation module
//!
//! All motion logic lives here. This module must be pure and deterministic:
//! - Caller-supplied elapsed time only
//! - Seeded RNG only
//! - Stable iteration order (by fish ID)
//! - Read-snapshot / write-back ticks, so results never depend on fish order
//! - No rendering or platform dependencies

pub mod chain;
pub mod neighbors;
pub mod params;
pub mod state;
pub mod steering;
pub mod tick;
pub mod vector;

use thiserror::Error;

pub use chain::{BodyChain, Chunk};
pub use neighbors::{Neighbor, NeighborView, Neighbors, rank_neighbors};
pub use params::SteeringParams;
pub use state::{Bounds, Fish, FishId, FleeState, RngState, School};
pub use steering::{Surroundings, steer};
pub use tick::{TickInput, move_fish, tick};
pub use vector::{VectorExt, angle3};

/// Errors raised when building or addressing simulation entities
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A body chain needs a head and at least one follower
    #[error("body chain needs at least 2 chunks, got {0}")]
    ChainTooShort(usize),
    /// Chunk radii must be finite and non-negative
    #[error("chunk {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    /// Orientation must be a finite, non-zero vector
    #[error("orientation ({x}, {y}) cannot be normalized")]
    DegenerateOrientation { x: f32, y: f32 },
    /// Bounds must be positive and at most `consts::MAX_WORLD_EXTENT`
    #[error("invalid bounds {width} x {height}")]
    InvalidBounds { width: f32, height: f32 },
    /// No fish with this id is registered in the school
    #[error("unknown fish {0:?}")]
    UnknownFish(FishId),
}
