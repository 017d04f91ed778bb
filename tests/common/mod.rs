//! Common test helpers for LUMEN-VOL integration tests
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use lumen_vol::prelude::*;

// ============================================================================
// Standard test patches
// ============================================================================

/// Square floor patch in the XZ plane at y = 0, from the origin
#[allow(dead_code)]
pub fn floor_quad(size: f32) -> PatchQuad {
    PatchQuad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(size, 0.0, 0.0),
        Vec3::new(0.0, 0.0, size),
        Vec3::new(size, 0.0, size),
    )
}

/// Vertical wall patch along X at the given z, rising from y = 0
#[allow(dead_code)]
pub fn wall_quad(size: f32, z: f32) -> PatchQuad {
    PatchQuad::new(
        Vec3::new(0.0, 0.0, z),
        Vec3::new(size, 0.0, z),
        Vec3::new(0.0, size, z),
        Vec3::new(size, size, z),
    )
}

// ============================================================================
// Test oracles
// ============================================================================

/// Blocks any ray segment crossing the plane y = `height`, from either side
#[allow(dead_code)]
pub struct CeilingOccluder {
    pub height: f32,
}

impl Occluder for CeilingOccluder {
    fn occluded(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Result<bool, OracleError> {
        if direction.y.abs() < 1.0e-6 {
            return Ok(false);
        }
        let t = (self.height - origin.y) / direction.y;
        Ok(t > 0.0 && t < max_distance)
    }
}

/// Blocks every query
#[allow(dead_code)]
pub struct FullOcclusion;

impl Occluder for FullOcclusion {
    fn occluded(&self, _: Vec3, _: Vec3, _: f32) -> Result<bool, OracleError> {
        Ok(true)
    }
}

/// Fails every query
#[allow(dead_code)]
pub struct FailingOracle;

impl Occluder for FailingOracle {
    fn occluded(&self, _: Vec3, _: Vec3, _: f32) -> Result<bool, OracleError> {
        Err(OracleError("physics backend unavailable".into()))
    }
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert two f32 values are close within tolerance
#[allow(dead_code)]
pub fn assert_close(a: f32, b: f32, tol: f32, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff={}, tol={})",
        msg,
        a,
        b,
        (a - b).abs(),
        tol
    );
}

/// Assert two vectors are close within tolerance
#[allow(dead_code)]
pub fn assert_vec3_close(a: Vec3, b: Vec3, tol: f32, msg: &str) {
    assert!(
        a.distance(b) < tol,
        "{}: {:?} vs {:?} (dist={}, tol={})",
        msg,
        a,
        b,
        a.distance(b),
        tol
    );
}
