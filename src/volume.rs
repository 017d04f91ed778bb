//! The bake pipeline and its owned result state
//!
//! [`LightVolume`] owns the full point collection, the lookup grid, and the
//! packed renderer snapshot, replacing each wholesale per invocation:
//! [`LightVolume::regenerate`] rebuilds points and grid from the patch set,
//! [`LightVolume::bake`] rewrites the colors, [`LightVolume::packed`] hands
//! out (and lazily refreshes) the snapshot. Nothing mutates incrementally
//! between invocations, so a renderer never observes a half-written state.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bake::{bake_lighting, Light, Occluder, OracleError};
use crate::dedup::dedup_points;
use crate::generate::{generate_points, GenerateConfig};
use crate::grid::{build_grid, GridError, GridStats, LightGrid};
use crate::neighbors::{link_neighbors, NEIGHBOR_FACTOR};
use crate::pack::{pack_buffers, PackedBuffers};
use crate::types::{Aabb, LightPoint, PatchQuad};

/// Full pipeline configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Target lattice spacing
    pub step_size: f32,
    /// Extension rings past patch edges and along normals
    pub ext_step_count: u32,
    /// World bounds of the lookup grid
    pub grid_bounds: Aabb,
    /// Edge length of one grid cell
    pub grid_cell_size: f32,
    /// Base irradiance every bake starts from
    pub ambient_color: Vec3,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        VolumeConfig {
            step_size: 1.0,
            ext_step_count: 5,
            grid_bounds: Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 3.0, 5.0)),
            grid_cell_size: 1.0,
            ambient_color: Vec3::new(0.1, 0.2, 0.4),
        }
    }
}

/// Pipeline failures that abort the current invocation
#[derive(Error, Debug)]
pub enum VolumeError {
    /// Grid capacity violation; the configuration needs tuning
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Visibility oracle failure during baking
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Combined diagnostics from a regeneration pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegenerateStats {
    /// Points emitted by the generator
    pub generated: usize,
    /// Points removed as near-duplicates
    pub deduplicated: usize,
    /// Final point count
    pub point_count: usize,
    /// Patches skipped as degenerate
    pub degenerate_patches: usize,
    /// Largest neighbor-list length
    pub largest_neighbor_count: usize,
    /// Grid build diagnostics
    pub grid: GridStats,
}

/// The owned output of the precompute pipeline
///
/// Holds the versioned point collection plus grid between invocations.
/// Renderer-facing buffers come out of [`LightVolume::packed`].
pub struct LightVolume {
    config: VolumeConfig,
    points: Vec<LightPoint>,
    grid: Option<LightGrid>,
    packed: Option<PackedBuffers>,
}

impl LightVolume {
    /// Create an empty volume with a configuration
    pub fn new(config: VolumeConfig) -> Self {
        LightVolume {
            config,
            points: Vec::new(),
            grid: None,
            packed: None,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    /// The current point collection
    pub fn points(&self) -> &[LightPoint] {
        &self.points
    }

    /// The current lookup grid, if a regeneration has run
    pub fn grid(&self) -> Option<&LightGrid> {
        self.grid.as_ref()
    }

    /// Rebuild the point cloud and grid from the patch set
    ///
    /// Runs generation, deduplication, the neighbor graph, and the grid
    /// build, then replaces all previous state at once. A grid capacity
    /// violation aborts with the previous state intact. The packed
    /// snapshot is dropped; the next [`LightVolume::packed`] call
    /// re-serializes.
    pub fn regenerate(&mut self, patches: &[PatchQuad]) -> Result<RegenerateStats, VolumeError> {
        let generate_config = GenerateConfig {
            step_size: self.config.step_size,
            ext_step_count: self.config.ext_step_count,
        };
        let (mut points, gen_stats) = generate_points(patches, &generate_config);
        let deduplicated = dedup_points(&mut points, self.config.step_size);
        let neighbor_stats =
            link_neighbors(&mut points, self.config.step_size * NEIGHBOR_FACTOR);
        let grid = build_grid(self.config.grid_bounds, self.config.grid_cell_size, &points)?;

        log::info!("Points generated: {}", points.len());
        log::info!(
            "Largest nearby count: {}",
            neighbor_stats.largest_neighbor_count
        );

        let stats = RegenerateStats {
            generated: gen_stats.generated,
            deduplicated,
            point_count: points.len(),
            degenerate_patches: gen_stats.degenerate_patches,
            largest_neighbor_count: neighbor_stats.largest_neighbor_count,
            grid: grid.stats,
        };

        self.points = points;
        self.grid = Some(grid);
        self.packed = None;
        Ok(stats)
    }

    /// Re-bake every point's irradiance from the light set
    ///
    /// On an oracle failure the previous colors and snapshot stay as they
    /// were; on success the packed snapshot is dropped so stale colors are
    /// never handed out.
    pub fn bake(&mut self, lights: &[Light], occluder: &dyn Occluder) -> Result<(), VolumeError> {
        bake_lighting(
            &mut self.points,
            lights,
            self.config.ambient_color,
            occluder,
        )?;
        self.packed = None;
        Ok(())
    }

    /// The renderer-facing buffer snapshot
    ///
    /// Re-packs when no snapshot exists or when the point count or grid
    /// buffer sizes have drifted from the packed version; otherwise the
    /// existing snapshot returns unchanged. `None` until the first
    /// regeneration.
    pub fn packed(&mut self) -> Option<&PackedBuffers> {
        let grid = self.grid.as_ref()?;
        let stale = match &self.packed {
            None => true,
            Some(packed) => packed.is_stale(self.points.len(), grid),
        };
        if stale {
            self.packed = Some(pack_buffers(&self.points, grid));
        }
        self.packed.as_ref()
    }
}
