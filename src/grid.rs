//! Spatial grid partitioning with bit-packed cell words
//!
//! Splits a world bounding volume into uniform cells and records, per cell,
//! which points' influence spheres overlap it. Each cell is one 32-bit
//! word: the low 20 bits are an offset into a shared point-index list, the
//! high 12 bits the count. The downstream renderer depends on this exact
//! layout; the fields are never widened silently.
//!
//! Author: Moroya Sakamoto

use glam::UVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Aabb, LightPoint};

/// Bit position where the count field starts in a cell word.
pub const CELL_OFFSET_BITS: u32 = 20;
/// Exclusive upper bound for a cell's list offset (2^20).
pub const CELL_MAX_OFFSET: u32 = 1 << CELL_OFFSET_BITS;
/// Exclusive upper bound for a cell's point count (2^12).
pub const CELL_MAX_COUNT: u32 = 1 << (32 - CELL_OFFSET_BITS);

/// Pack a cell's list offset and point count into one 32-bit word
///
/// Callers must have validated `offset < CELL_MAX_OFFSET` and
/// `count < CELL_MAX_COUNT`.
#[inline]
pub fn pack_cell_word(offset: u32, count: u32) -> u32 {
    debug_assert!(offset < CELL_MAX_OFFSET);
    debug_assert!(count < CELL_MAX_COUNT);
    offset | (count << CELL_OFFSET_BITS)
}

/// Split a packed cell word back into (offset, count)
#[inline]
pub fn unpack_cell_word(word: u32) -> (u32, u32) {
    (word & (CELL_MAX_OFFSET - 1), word >> CELL_OFFSET_BITS)
}

/// Grid construction failures
///
/// Both variants are fatal for the current bake configuration: the dataset
/// needs a coarser cell size or a sparser point cloud.
#[derive(Error, Debug)]
pub enum GridError {
    /// A single cell exceeded the 12-bit point count field
    #[error("grid cell ({x}, {y}, {z}) holds {count} points, over the {max} per-cell capacity")]
    CellOverflow {
        /// Cell x coordinate
        x: u32,
        /// Cell y coordinate
        y: u32,
        /// Cell z coordinate
        z: u32,
        /// Points assigned to the cell
        count: usize,
        /// Exclusive capacity limit
        max: u32,
    },

    /// The shared index list outgrew the 20-bit offset field
    #[error("point-index offset {offset} at cell ({x}, {y}, {z}) exceeds the {max} addressable capacity")]
    OffsetOverflow {
        /// Cell x coordinate
        x: u32,
        /// Cell y coordinate
        y: u32,
        /// Cell z coordinate
        z: u32,
        /// Offset the cell would have recorded
        offset: usize,
        /// Exclusive capacity limit
        max: u32,
    },
}

/// Diagnostics from a grid build, useful for tuning cell size
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GridStats {
    /// Largest number of points recorded in one cell
    pub max_per_cell: u32,
    /// Mean number of points per cell
    pub avg_per_cell: f32,
}

/// A dense uniform grid over the point cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightGrid {
    /// World bounds the grid covers
    pub bounds: Aabb,
    /// Edge length of one cell
    pub cell_size: f32,
    /// Cell counts per axis
    pub dims: UVec3,
    /// Packed (offset, count) word per cell, row-major with x fastest
    pub cells: Vec<u32>,
    /// Shared point-index list the cell words slice into
    pub point_indices: Vec<u32>,
    /// Build diagnostics
    pub stats: GridStats,
}

impl LightGrid {
    /// Flat index of a cell (x fastest, then y, then z)
    #[inline]
    pub fn cell_index(&self, x: u32, y: u32, z: u32) -> usize {
        (x + y * self.dims.x + z * self.dims.x * self.dims.y) as usize
    }

    /// The slice of point indices recorded for a cell
    pub fn cell_points(&self, x: u32, y: u32, z: u32) -> &[u32] {
        let (offset, count) = unpack_cell_word(self.cells[self.cell_index(x, y, z)]);
        &self.point_indices[offset as usize..(offset + count) as usize]
    }

    /// Total cell count
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Partition the bounding volume and assign points to cells
///
/// Dimensions are `ceil(extent / cell_size)` per axis, clamped to at least
/// one so a flat volume still gets a cell layer. Cells are visited in
/// row-major order with x fastest; each scans the full point list and
/// appends the indices of points whose influence sphere overlaps the cell
/// ([`Aabb::intersects_sphere`], boundary-exclusive) to the shared list,
/// recording its packed (offset, count) word. Capacity violations abort the
/// build with the offending cell.
pub fn build_grid(
    bounds: Aabb,
    cell_size: f32,
    points: &[LightPoint],
) -> Result<LightGrid, GridError> {
    let size = bounds.size();
    let dims = UVec3::new(
        (size.x / cell_size).ceil().max(1.0) as u32,
        (size.y / cell_size).ceil().max(1.0) as u32,
        (size.z / cell_size).ceil().max(1.0) as u32,
    );

    let cell_count = (dims.x * dims.y * dims.z) as usize;
    let mut cells = vec![0u32; cell_count];
    let mut point_indices: Vec<u32> = Vec::new();
    let mut max_per_cell = 0usize;

    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                let cell = bounds.get_cell(x as i32, y as i32, z as i32, dims);
                let offset = point_indices.len();
                for (i, point) in points.iter().enumerate() {
                    if cell.intersects_sphere(point.position, point.influence_radius) {
                        point_indices.push(i as u32);
                    }
                }
                let count = point_indices.len() - offset;

                if count >= CELL_MAX_COUNT as usize {
                    return Err(GridError::CellOverflow {
                        x,
                        y,
                        z,
                        count,
                        max: CELL_MAX_COUNT,
                    });
                }
                if offset >= CELL_MAX_OFFSET as usize {
                    return Err(GridError::OffsetOverflow {
                        x,
                        y,
                        z,
                        offset,
                        max: CELL_MAX_OFFSET,
                    });
                }

                cells[(x + y * dims.x + z * dims.x * dims.y) as usize] =
                    pack_cell_word(offset as u32, count as u32);
                max_per_cell = max_per_cell.max(count);
            }
        }
    }

    let stats = GridStats {
        max_per_cell: max_per_cell as u32,
        avg_per_cell: point_indices.len() as f32 / cell_count as f32,
    };
    log::info!(
        "Built grid: {}x{}x{}, max # per cell: {}, avg # per cell: {:.2}",
        dims.x,
        dims.y,
        dims.z,
        stats.max_per_cell,
        stats.avg_per_cell
    );

    Ok(LightGrid {
        bounds,
        cell_size,
        dims,
        cells,
        point_indices,
        stats,
    })
}
