//! # LUMEN-VOL
//!
//! **L.U.M.E.N. - Lattice-based Unified Mapping of Environmental Nearfield-light**
//!
//! Precomputes a sparse cloud of static light-sample points over a set of
//! surface patches, links each point to its spatial neighbors, bakes direct
//! irradiance with binary visibility, and packs the result plus a uniform
//! lookup grid into flat buffers a renderer consumes for real-time
//! volumetric lighting.
//!
//! ## Pipeline
//!
//! - **Generate**: sample each patch into a regular lattice, with extension
//!   rings past the edges and lifted shells along the normal
//! - **Deduplicate**: merge near-coincident points, keeping the one closer
//!   to its generating surface
//! - **Link**: record each point's nearby points and influence radius
//! - **Grid**: partition a world volume into cells with bit-packed
//!   (offset, count) indices into a shared point list
//! - **Bake**: accumulate visibility-weighted light into every point
//! - **Pack**: serialize points, neighbors, and grid into fixed-layout
//!   GPU buffers
//!
//! ## Example
//!
//! ```rust
//! use lumen_vol::prelude::*;
//! use glam::Vec3;
//!
//! // One 2x2 floor patch in the XZ plane
//! let quad = PatchQuad::new(
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(2.0, 0.0, 0.0),
//!     Vec3::new(0.0, 0.0, 2.0),
//!     Vec3::new(2.0, 0.0, 2.0),
//! );
//!
//! let mut volume = LightVolume::new(VolumeConfig {
//!     step_size: 1.0,
//!     ext_step_count: 0,
//!     grid_bounds: Aabb::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 2.0)),
//!     grid_cell_size: 2.0,
//!     ..Default::default()
//! });
//!
//! let stats = volume.regenerate(&[quad]).unwrap();
//! assert_eq!(stats.point_count, 9);
//!
//! let lights = [Light::Directional {
//!     direction: Vec3::new(0.0, -1.0, 0.0),
//!     color: Vec3::new(1.0, 0.95, 0.8),
//! }];
//! volume.bake(&lights, &NoOcclusion).unwrap();
//!
//! let buffers = volume.packed().unwrap();
//! assert_eq!(buffers.points.len(), 9);
//! ```
//!
//! ## Author
//!
//! Moroya Sakamoto

#![warn(missing_docs)]

pub mod types;
pub mod generate;
pub mod dedup;
pub mod neighbors;
pub mod grid;
pub mod bake;
pub mod pack;
pub mod volume;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::bake::{bake_lighting, Light, NoOcclusion, Occluder, OracleError};
    pub use crate::dedup::dedup_points;
    pub use crate::generate::{generate_points, GenerateConfig, GenerateStats};
    pub use crate::grid::{
        build_grid, pack_cell_word, unpack_cell_word, GridError, GridStats, LightGrid,
        CELL_MAX_COUNT, CELL_MAX_OFFSET,
    };
    pub use crate::neighbors::{link_neighbors, NeighborStats, NEIGHBOR_FACTOR};
    pub use crate::pack::{
        pack_buffers, PackStats, PackedBuffers, PackedLightPoint, MAX_NEIGHBORS,
    };
    pub use crate::types::{Aabb, LightPoint, PatchQuad};
    pub use crate::volume::{LightVolume, RegenerateStats, VolumeConfig, VolumeError};
    pub use glam::{Mat4, UVec3, Vec3};
}

// Re-exports for convenience
pub use bake::{Light, Occluder};
pub use grid::LightGrid;
pub use pack::PackedBuffers;
pub use types::{Aabb, LightPoint, PatchQuad};
pub use volume::{LightVolume, VolumeConfig};
