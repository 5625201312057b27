//! Body silhouette geometry
//!
//! Pure functions of a chunk list. Renderers (canvas, SVG, GPU) turn these
//! points into curves; nothing here draws.

use glam::Vec2;
use std::f32::consts::FRAC_PI_4;

use crate::sim::chain::Chunk;
use crate::sim::vector::{VectorExt, angle3};

/// Which flank of the body a fin hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Counter-clockwise normal of the heading
    Left,
    /// Clockwise normal of the heading
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Closed loop of silhouette points.
///
/// Starts at the nose, runs down the left flank to the tail tip, then back up
/// the right flank. Each chunk contributes one point per flank at its radius;
/// the head adds two shoulder points at 45°. Returns an empty list for chains
/// shorter than 2 chunks.
pub fn body_outline(chunks: &[Chunk]) -> Vec<Vec2> {
    if chunks.len() < 2 {
        return Vec::new();
    }
    let last = chunks[chunks.len() - 1];

    let orientations: Vec<Vec2> = chunks
        .windows(2)
        .map(|pair| pair[0].position - pair[1].position)
        .collect();

    let head = chunks[0];
    let forward = orientations[0].resize(head.radius());

    let mut left = Vec::with_capacity(chunks.len() + 2);
    let mut right = Vec::with_capacity(chunks.len());
    left.push(head.position + forward);
    left.push(head.position + forward.rotated(FRAC_PI_4));
    right.push(head.position + forward.rotated(-FRAC_PI_4));

    for (chunk, orientation) in chunks.iter().zip(&orientations) {
        left.push(chunk.position + orientation.ccw_normal().resize(chunk.radius()));
        right.push(chunk.position + orientation.cw_normal().resize(chunk.radius()));
    }
    left.push(last.position);

    left.extend(right.into_iter().rev());
    left
}

/// Mean signed turning angle along the body, head to tail
pub fn curvature(chunks: &[Chunk]) -> f32 {
    if chunks.len() < 3 {
        return 0.0;
    }
    let turns = chunks
        .windows(3)
        .map(|w| angle3(w[0].position, w[1].position, w[2].position));
    let count = chunks.len() - 2;
    turns.sum::<f32>() / count as f32
}

/// Where a lateral fin attaches: on the flank of chunk `at`, perpendicular to
/// the segment joining its two neighbors. `None` for the head or tail chunk.
pub fn lateral_fin_anchor(chunks: &[Chunk], at: usize, side: Side) -> Option<Vec2> {
    if at == 0 || at + 1 >= chunks.len() {
        return None;
    }
    let span = chunks[at - 1].position - chunks[at + 1].position;
    let offset = span
        .rotated(side.sign() * std::f32::consts::FRAC_PI_2)
        .try_resize(chunks[at].radius())?;
    Some(chunks[at].position + offset)
}
