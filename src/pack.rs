//! Fixed-layout GPU buffer packing
//!
//! Serializes the point cloud and grid into flat, bit-exact buffers for the
//! downstream renderer: one fixed-size record per point with up to
//! [`MAX_NEIGHBORS`] packed neighbor slots, the grid cell words and shared
//! point-index list verbatim, and the grid metadata.
//!
//! Author: Moroya Sakamoto

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::grid::LightGrid;
use crate::types::LightPoint;

/// Neighbor slots in one packed record. Fixed by the renderer-side layout.
pub const MAX_NEIGHBORS: usize = 27;

/// One renderer-facing light point record
///
/// 464 bytes: position, influence radius, baked color, valid neighbor
/// count, then 27 neighbor slots of unit direction plus length. Slots past
/// `neighbor_count` are zero-filled. Slot `i`'s original offset vector is
/// reconstructed as `direction * length`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PackedLightPoint {
    /// World-space position
    pub position: [f32; 3],
    /// Influence sphere radius
    pub radius: f32,
    /// Baked RGB irradiance
    pub color: [f32; 3],
    /// Number of valid neighbor slots
    pub neighbor_count: u32,
    /// Neighbor slots: xyz = unit direction, w = length
    pub neighbors: [[f32; 4]; MAX_NEIGHBORS],
}

/// Diagnostics from a packing pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PackStats {
    /// Points that lost neighbors to the slot limit
    pub truncated_points: usize,
    /// Largest neighbor count observed before truncation
    pub max_neighbor_count: usize,
}

/// The complete buffer snapshot handed to the renderer
///
/// Immutable once handed out; a new bake replaces the whole snapshot rather
/// than mutating it in place.
#[derive(Debug, Clone)]
pub struct PackedBuffers {
    /// One fixed-size record per light point
    pub points: Vec<PackedLightPoint>,
    /// Packed (offset, count) word per grid cell, row-major with x fastest
    pub grid_cells: Vec<u32>,
    /// Shared point-index list
    pub point_indices: Vec<u32>,
    /// Grid bounds minimum corner
    pub bounds_min: [f32; 3],
    /// Grid bounds maximum corner
    pub bounds_max: [f32; 3],
    /// Grid cell counts per axis
    pub grid_dims: [u32; 3],
    /// Packing diagnostics
    pub stats: PackStats,
}

impl PackedBuffers {
    /// Raw bytes of the point records, for direct GPU upload
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }

    /// Raw bytes of the grid cell words
    pub fn grid_cell_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.grid_cells)
    }

    /// Raw bytes of the point-index list
    pub fn point_index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.point_indices)
    }

    /// Whether this snapshot no longer matches the pipeline's buffer sizes
    pub fn is_stale(&self, point_count: usize, grid: &LightGrid) -> bool {
        self.points.len() != point_count
            || self.grid_cells.len() != grid.cells.len()
            || self.point_indices.len() != grid.point_indices.len()
    }
}

/// Pack one point into its fixed-size record
fn pack_point(point: &LightPoint) -> PackedLightPoint {
    let mut record = PackedLightPoint {
        position: point.position.to_array(),
        radius: point.influence_radius,
        color: point.color.to_array(),
        neighbor_count: point.neighbors.len().min(MAX_NEIGHBORS) as u32,
        neighbors: [[0.0; 4]; MAX_NEIGHBORS],
    };
    for (slot, vec) in point.neighbors.iter().take(MAX_NEIGHBORS).enumerate() {
        let length = vec.length();
        let dir = vec.normalize_or_zero();
        record.neighbors[slot] = [dir.x, dir.y, dir.z, length];
    }
    record
}

/// Serialize the point cloud and grid into a renderer snapshot
///
/// Neighbor lists longer than [`MAX_NEIGHBORS`] truncate in list order; the
/// loss surfaces through [`PackStats`] and a warning, never an error.
pub fn pack_buffers(points: &[LightPoint], grid: &LightGrid) -> PackedBuffers {
    let mut stats = PackStats::default();
    let records: Vec<PackedLightPoint> = points
        .iter()
        .map(|point| {
            stats.max_neighbor_count = stats.max_neighbor_count.max(point.neighbors.len());
            if point.neighbors.len() > MAX_NEIGHBORS {
                stats.truncated_points += 1;
            }
            pack_point(point)
        })
        .collect();

    if stats.truncated_points > 0 {
        log::warn!(
            "{} points exceeded the {} neighbor slots (largest count: {})",
            stats.truncated_points,
            MAX_NEIGHBORS,
            stats.max_neighbor_count
        );
    }

    PackedBuffers {
        points: records,
        grid_cells: grid.cells.clone(),
        point_indices: grid.point_indices.clone(),
        bounds_min: grid.bounds.min.to_array(),
        bounds_max: grid.bounds.max.to_array(),
        grid_dims: grid.dims.to_array(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::types::Aabb;
    use glam::Vec3;

    fn empty_grid() -> LightGrid {
        build_grid(Aabb::new(Vec3::ZERO, Vec3::ONE), 1.0, &[]).unwrap()
    }

    fn point_with_neighbors(neighbors: Vec<Vec3>) -> LightPoint {
        let mut p = LightPoint::new(Vec3::ZERO, 0.0);
        p.influence_radius = neighbors
            .iter()
            .map(|v| v.length())
            .fold(0.0f32, f32::max);
        p.neighbors = neighbors;
        p
    }

    #[test]
    fn test_record_size_is_fixed() {
        assert_eq!(std::mem::size_of::<PackedLightPoint>(), 464);
    }

    #[test]
    fn test_neighbor_slots_round_trip() {
        let neighbors = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.7, 0.7, 0.1),
        ];
        let point = point_with_neighbors(neighbors.clone());
        let buffers = pack_buffers(&[point], &empty_grid());

        let record = &buffers.points[0];
        assert_eq!(record.neighbor_count, 3);
        for (slot, original) in neighbors.iter().enumerate() {
            let [x, y, z, len] = record.neighbors[slot];
            let rebuilt = Vec3::new(x, y, z) * len;
            assert!(
                rebuilt.distance(*original) < 1.0e-5,
                "Slot {} should reconstruct {:?}, got {:?}",
                slot,
                original,
                rebuilt
            );
        }
    }

    #[test]
    fn test_unused_slots_zero_filled() {
        let point = point_with_neighbors(vec![Vec3::X]);
        let buffers = pack_buffers(&[point], &empty_grid());

        for slot in 1..MAX_NEIGHBORS {
            assert_eq!(buffers.points[0].neighbors[slot], [0.0; 4]);
        }
    }

    #[test]
    fn test_truncation_is_reported_not_fatal() {
        let neighbors: Vec<Vec3> = (0..MAX_NEIGHBORS + 5)
            .map(|i| Vec3::new(i as f32 + 1.0, 0.0, 0.0))
            .collect();
        let point = point_with_neighbors(neighbors.clone());
        let buffers = pack_buffers(&[point], &empty_grid());

        assert_eq!(buffers.points[0].neighbor_count, MAX_NEIGHBORS as u32);
        assert_eq!(buffers.stats.truncated_points, 1);
        assert_eq!(buffers.stats.max_neighbor_count, MAX_NEIGHBORS + 5);

        // First 27 in original order survive
        let [x, y, z, len] = buffers.points[0].neighbors[MAX_NEIGHBORS - 1];
        let rebuilt = Vec3::new(x, y, z) * len;
        assert!(rebuilt.distance(neighbors[MAX_NEIGHBORS - 1]) < 1.0e-4);
    }

    #[test]
    fn test_grid_buffers_copied_verbatim() {
        let points = vec![{
            let mut p = LightPoint::new(Vec3::splat(0.5), 0.0);
            p.influence_radius = 0.3;
            p
        }];
        let grid = build_grid(Aabb::new(Vec3::ZERO, Vec3::ONE), 1.0, &points).unwrap();
        let buffers = pack_buffers(&points, &grid);

        assert_eq!(buffers.grid_cells, grid.cells);
        assert_eq!(buffers.point_indices, grid.point_indices);
        assert_eq!(buffers.bounds_min, [0.0; 3]);
        assert_eq!(buffers.bounds_max, [1.0; 3]);
        assert_eq!(buffers.grid_dims, [1, 1, 1]);
    }

    #[test]
    fn test_byte_views() {
        let point = point_with_neighbors(vec![Vec3::X]);
        let grid = empty_grid();
        let buffers = pack_buffers(&[point], &grid);

        assert_eq!(buffers.point_bytes().len(), 464);
        assert_eq!(buffers.grid_cell_bytes().len(), grid.cells.len() * 4);
    }

    #[test]
    fn test_staleness_tracks_sizes() {
        let point = point_with_neighbors(vec![Vec3::X]);
        let grid = empty_grid();
        let buffers = pack_buffers(&[point], &grid);

        assert!(!buffers.is_stale(1, &grid));
        assert!(buffers.is_stale(2, &grid), "A point count change is stale");
    }
}
