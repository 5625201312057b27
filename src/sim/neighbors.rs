//! Nearest-neighbor ranking
//!
//! Every fish is ranked against every other by squared head distance, so a
//! tick costs O(n² log n).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::state::{Fish, FishId, School};

/// Read-only copy of what neighbors need to know about a fish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborView {
    pub id: FishId,
    pub position: Vec2,
    pub direction: Vec2,
}

impl NeighborView {
    pub fn of(fish: &Fish) -> Self {
        Self {
            id: fish.id(),
            position: fish.position(),
            direction: fish.direction(),
        }
    }
}

/// One ranked entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub view: NeighborView,
    pub sqr_dist: f32,
}

/// The closest fish to a subject, nearest first.
///
/// Rank 0 is always the subject itself. Use [`Neighbors::others`] to iterate
/// the actual neighbors together with their rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    ranked: Vec<Neighbor>,
}

impl Neighbors {
    /// All ranked entries, subject included at index 0
    #[inline]
    pub fn ranked(&self) -> &[Neighbor] {
        &self.ranked
    }

    /// The fish the ranking was computed for
    #[inline]
    pub fn subject(&self) -> &Neighbor {
        &self.ranked[0]
    }

    /// Entries ranked 1.., paired with their rank
    pub fn others(&self) -> impl Iterator<Item = (usize, &Neighbor)> {
        self.ranked.iter().enumerate().skip(1)
    }

    /// Number of ranked entries, subject included
    #[inline]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Always false: the subject is always ranked
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Rank `views` by distance to `views[subject]` and keep the first `count`.
///
/// Ties are broken by putting the subject first, then by ascending id, so the
/// result is fully deterministic. `count` is raised to 1 so the subject is
/// always present.
pub fn rank_neighbors(views: &[NeighborView], subject: usize, count: usize) -> Neighbors {
    let me = views[subject];
    let mut ranked: Vec<Neighbor> = views
        .iter()
        .map(|&view| Neighbor {
            view,
            sqr_dist: view.position.distance_squared(me.position),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.sqr_dist
            .total_cmp(&b.sqr_dist)
            .then_with(|| (a.view.id != me.id).cmp(&(b.view.id != me.id)))
            .then_with(|| a.view.id.cmp(&b.view.id))
    });
    ranked.truncate(count.max(1));

    Neighbors { ranked }
}

impl School {
    /// Snapshot of every fish, in id order
    pub fn views(&self) -> Vec<NeighborView> {
        self.fishes().iter().map(NeighborView::of).collect()
    }

    /// The `count` fish closest to `id`, the fish itself at rank 0
    pub fn find_neighbors(&self, id: FishId, count: usize) -> Result<Neighbors, SimError> {
        let index = self.index_of(id).ok_or(SimError::UnknownFish(id))?;
        Ok(rank_neighbors(&self.views(), index, count))
    }
}
