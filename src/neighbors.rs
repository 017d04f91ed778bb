//! Neighbor graph construction (Deep Fried Edition)
//!
//! Links every point to the points inside its neighbor radius and records
//! the influence radius used for grid-cell membership. All-pairs distance
//! scan over an immutable position snapshot, parallelized across points
//! with Rayon.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::LightPoint;

/// Multiple of the step size inside which two points count as neighbors.
///
/// Slightly over one, so direct lattice neighbors a full step apart are
/// always captured while diagonals are not.
pub const NEIGHBOR_FACTOR: f32 = 1.1;

/// Counters from a neighbor-graph pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NeighborStats {
    /// Largest neighbor-list length over all points
    pub largest_neighbor_count: usize,
}

/// Populate every point's neighbor list and influence radius
///
/// For each ordered pair inside `radius_threshold` (strict) the offset
/// vector to the neighbor is recorded, and the influence radius becomes the
/// maximum recorded distance. Each point's list is computed independently,
/// so the adjacency relation comes out symmetric even though the stored
/// vectors differ in sign. A point with no neighbors keeps an empty list
/// and a zero radius; its influence sphere degenerates to a point and it
/// lands in no grid cell.
pub fn link_neighbors(points: &mut [LightPoint], radius_threshold: f32) -> NeighborStats {
    let positions: Vec<Vec3> = points.iter().map(|p| p.position).collect();

    points.par_iter_mut().enumerate().for_each(|(i, point)| {
        let mut neighbors = Vec::new();
        let mut radius = 0.0f32;
        for (j, &other) in positions.iter().enumerate() {
            if j == i {
                continue;
            }
            let vec = other - point.position;
            let len = vec.length();
            if len < radius_threshold {
                radius = radius.max(len);
                neighbors.push(vec);
            }
        }
        point.neighbors = neighbors;
        point.influence_radius = radius;
    });

    NeighborStats {
        largest_neighbor_count: points.iter().map(|p| p.neighbors.len()).max().unwrap_or(0),
    }
}
