//! Core types for LUMEN-VOL
//!
//! Axis-aligned boxes, surface patch quads, and the light-sample point
//! record that flows through the bake pipeline.
//!
//! Author: Moroya Sakamoto

use glam::{Mat4, UVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB
    ///
    /// Callers keep `min <= max` component-wise.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    /// Create from center and half-extents
    pub fn from_center_extents(center: Vec3, half_extents: Vec3) -> Self {
        Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if point is inside (boundary-inclusive)
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Sub-box at integer cell coordinates of a `dims` subdivision
    ///
    /// Both corners interpolate the box corners at fractional coordinates
    /// `x / dims.x` and `(x + 1) / dims.x` (and likewise per axis). The
    /// interpolation is unclamped, so coordinates outside `0..dims`
    /// extrapolate past the box.
    pub fn get_cell(&self, x: i32, y: i32, z: i32, dims: UVec3) -> Aabb {
        let inv = Vec3::new(
            1.0 / dims.x as f32,
            1.0 / dims.y as f32,
            1.0 / dims.z as f32,
        );
        let t0 = Vec3::new(x as f32, y as f32, z as f32) * inv;
        let t1 = Vec3::new((x + 1) as f32, (y + 1) as f32, (z + 1) as f32) * inv;
        let extent = self.max - self.min;
        Aabb {
            min: self.min + extent * t0,
            max: self.min + extent * t1,
        }
    }

    /// Clamp a point into the box per axis
    pub fn limit_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Sphere overlap test, boundary-exclusive
    ///
    /// True iff the distance from `center` to its box-clamped projection is
    /// strictly less than `radius`. A sphere exactly tangent to the box does
    /// not intersect, and a zero radius never intersects anything.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        (center - self.limit_point(center)).length() < radius
    }
}

/// A world-space quadrilateral surface patch
///
/// Corners are named by their (horizontal, vertical) lattice position:
/// `p00`/`p10` span the bottom edge, `p01`/`p11` the top. The patch is the
/// generating surface for a lattice of light points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchQuad {
    /// Bottom-left corner
    pub p00: Vec3,
    /// Bottom-right corner
    pub p10: Vec3,
    /// Top-left corner
    pub p01: Vec3,
    /// Top-right corner
    pub p11: Vec3,
}

impl PatchQuad {
    /// Create a quad from four world-space corners
    pub fn new(p00: Vec3, p10: Vec3, p01: Vec3, p11: Vec3) -> Self {
        PatchQuad { p00, p10, p01, p11 }
    }

    /// Apply a world transform to all four corners
    pub fn transformed(&self, transform: &Mat4) -> PatchQuad {
        PatchQuad {
            p00: transform.transform_point3(self.p00),
            p10: transform.transform_point3(self.p10),
            p01: transform.transform_point3(self.p01),
            p11: transform.transform_point3(self.p11),
        }
    }

    /// Average of the two horizontal edge lengths
    pub fn len_h(&self) -> f32 {
        (self.p10 + self.p11 - self.p00 - self.p01).length() * 0.5
    }

    /// Average of the two vertical edge lengths
    pub fn len_v(&self) -> f32 {
        (self.p01 + self.p11 - self.p00 - self.p10).length() * 0.5
    }
}

/// A single static light-sample point
///
/// Created by the generator; `neighbors` and `influence_radius` are filled
/// by the neighbor-graph pass, `color` by the irradiance baker. The whole
/// collection is replaced wholesale on each regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightPoint {
    /// World-space position
    pub position: Vec3,
    /// Distance traveled from the in-plane lattice position (0 on-surface)
    pub surface_distance: f32,
    /// Baked RGB irradiance
    pub color: Vec3,
    /// Offsets to nearby points (direction and length in one vector)
    pub neighbors: Vec<Vec3>,
    /// Distance to the farthest recorded neighbor (0 when isolated)
    pub influence_radius: f32,
}

impl LightPoint {
    /// Create a point at a position with its generation offset distance
    pub fn new(position: Vec3, surface_distance: f32) -> Self {
        LightPoint {
            position,
            surface_distance,
            color: Vec3::ZERO,
            neighbors: Vec::new(),
            influence_radius: 0.0,
        }
    }
}
