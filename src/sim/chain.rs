//! Body chain: fixed-radius chunks held at a fixed link length
//!
//! Moving the head re-solves each following chunk in one forward pass: a
//! chunk is pulled along the line joining it to its (already moved)
//! predecessor until it sits exactly one link away.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::vector::VectorExt;

/// One body segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    radius: f32,
    pub position: Vec2,
}

impl Chunk {
    pub fn new(radius: f32, position: Vec2) -> Self {
        Self { radius, position }
    }

    /// Silhouette half-width at this chunk, fixed at construction
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// Ordered chunks, head at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyChain {
    chunks: Vec<Chunk>,
    link_length: f32,
}

impl BodyChain {
    /// Lay the chain out straight behind `head`, opposite to `orientation`
    pub fn new(
        head: Vec2,
        orientation: Vec2,
        radii: &[f32],
        link_length: f32,
    ) -> Result<Self, SimError> {
        if radii.len() < 2 {
            return Err(SimError::ChainTooShort(radii.len()));
        }
        if let Some((index, &radius)) = radii
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || **r < 0.0)
        {
            return Err(SimError::InvalidRadius { index, radius });
        }
        let step = orientation
            .try_resize(link_length)
            .ok_or(SimError::DegenerateOrientation {
                x: orientation.x,
                y: orientation.y,
            })?;

        let chunks = radii
            .iter()
            .enumerate()
            .map(|(i, &radius)| Chunk::new(radius, head - step * i as f32))
            .collect();

        Ok(Self {
            chunks,
            link_length,
        })
    }

    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false: construction rejects short chains
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[inline]
    pub fn link_length(&self) -> f32 {
        self.link_length
    }

    #[inline]
    pub fn head(&self) -> Vec2 {
        self.chunks[0].position
    }

    /// Current heading: from the second chunk to the head
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.chunks[0].position - self.chunks[1].position
    }

    /// Move the head and drag the rest of the body after it
    pub fn set_head_position(&mut self, head: Vec2) {
        self.chunks[0].position = head;
        let mut prev = head;
        for chunk in self.chunks.iter_mut().skip(1) {
            chunk.position = prev + (chunk.position - prev).resize(self.link_length);
            prev = chunk.position;
        }
    }
}
