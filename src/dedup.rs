//! Near-coincident point merging
//!
//! Overlapping patches and extension rings produce clusters of almost
//! identical samples. This pass collapses pairs closer than half the lattice
//! step, keeping the point generated closer to its surface. O(n^2) pairwise
//! compaction; expect this cost to dominate for large clouds.
//!
//! Author: Moroya Sakamoto

use crate::types::LightPoint;

/// Fraction of the step size below which two points merge.
///
/// Just under one half, so adjacent lattice points a full step apart never
/// merge through float noise.
pub const DEDUP_FACTOR: f32 = 0.4999;

/// Remove near-duplicate points in place, returning how many were dropped
///
/// For every pair closer than [`DEDUP_FACTOR`]` * step_size` the point with
/// the larger `surface_distance` is discarded; on a tie the higher index
/// goes. After a removal the scan resumes against the surviving point, so
/// the pass leaves no remaining pair under the threshold. Relative order of
/// survivors is preserved.
pub fn dedup_points(points: &mut Vec<LightPoint>, step_size: f32) -> usize {
    let threshold = step_size * DEDUP_FACTOR;
    let before = points.len();

    let mut i = 0;
    while i < points.len() {
        let mut keep_i = true;
        let mut j = i + 1;
        while j < points.len() {
            if points[i].position.distance(points[j].position) < threshold {
                if points[i].surface_distance <= points[j].surface_distance {
                    points.remove(j);
                    continue;
                }
                points.remove(i);
                keep_i = false;
                break;
            }
            j += 1;
        }
        if keep_i {
            i += 1;
        }
    }

    before - points.len()
}
