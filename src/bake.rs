//! Irradiance baking against a visibility oracle (Deep Fried Edition)
//!
//! Accumulates visibility-weighted direct light into every point from a
//! fixed light set: an unweighted contribution per visible directional
//! light, and a falloff-and-facing attenuated contribution per visible
//! rectangular area light. Points bake in parallel with Rayon; an oracle
//! failure aborts the pass before any color is installed.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LightPoint;

/// Cast length for directional-light shadow rays.
pub const DIRECTIONAL_CAST_DISTANCE: f32 = 1000.0;

/// Offset trimmed from ray ends to avoid self-intersection.
pub const SELF_HIT_EPSILON: f32 = 0.001;

/// A light source contributing baked irradiance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Light {
    /// Infinitely distant light with a fixed travel direction
    Directional {
        /// Direction the light travels (normalized)
        direction: Vec3,
        /// Light color/intensity (RGB, HDR)
        color: Vec3,
    },

    /// Rectangular area light with distance falloff and facing attenuation
    RectArea {
        /// World-space position of the light surface
        position: Vec3,
        /// Emission direction (normalized)
        forward: Vec3,
        /// Light color/intensity (RGB, HDR)
        color: Vec3,
        /// Distance at which the contribution reaches zero
        range: f32,
    },
}

/// Visibility-oracle failure, fatal for the current bake
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("visibility query failed: {0}")]
pub struct OracleError(
    /// Description of the failure from the host
    pub String,
);

/// Host-supplied binary visibility query
///
/// `occluded` answers whether anything blocks the segment starting at
/// `origin`, along the normalized `direction`, within `max_distance`.
/// Implementations must treat backfaces as occluders so interior samples
/// are not lit through thin geometry. Errors propagate as-is and abort
/// the bake; there is no retry.
pub trait Occluder: Sync {
    /// True when the segment is blocked
    fn occluded(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Result<bool, OracleError>;
}

/// An oracle that never blocks; open scenes and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcclusion;

impl Occluder for NoOcclusion {
    fn occluded(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
    ) -> Result<bool, OracleError> {
        Ok(false)
    }
}

/// Accumulate all visible light contributions for one position
fn bake_point(
    position: Vec3,
    lights: &[Light],
    ambient: Vec3,
    occluder: &dyn Occluder,
) -> Result<Vec3, OracleError> {
    let mut color = ambient;
    for light in lights {
        match *light {
            Light::Directional {
                direction,
                color: light_color,
            } => {
                // Cast from far behind the point toward it, stopping just short
                let origin =
                    position - direction * (DIRECTIONAL_CAST_DISTANCE + SELF_HIT_EPSILON);
                if !occluder.occluded(origin, direction, DIRECTIONAL_CAST_DISTANCE)? {
                    color += light_color;
                }
            }
            Light::RectArea {
                position: light_pos,
                forward,
                color: light_color,
                range,
            } => {
                let to_point = position - light_pos;
                let distance = to_point.length();
                if distance <= f32::EPSILON {
                    continue;
                }
                let direction = to_point / distance;
                let max_distance = (distance - 2.0 * SELF_HIT_EPSILON).max(0.0);
                let origin = light_pos + direction * SELF_HIT_EPSILON;
                if !occluder.occluded(origin, direction, max_distance)? {
                    let falloff = (1.0 - distance / range).clamp(0.0, 1.0);
                    let facing = forward.dot(direction).clamp(0.0, 1.0);
                    color += light_color * (falloff * facing);
                }
            }
        }
    }
    Ok(color)
}

/// Bake every point's irradiance from the light set
///
/// Each point's color resets to `ambient` and accumulates the visible
/// contribution of every light. Points have no cross-dependency, so the
/// pass runs data-parallel; results install only after every query has
/// succeeded, leaving the previous colors untouched on failure.
pub fn bake_lighting(
    points: &mut [LightPoint],
    lights: &[Light],
    ambient: Vec3,
    occluder: &dyn Occluder,
) -> Result<(), OracleError> {
    let colors = points
        .par_iter()
        .map(|point| bake_point(point.position, lights, ambient, occluder))
        .collect::<Result<Vec<Vec3>, OracleError>>()?;

    for (point, color) in points.iter_mut().zip(colors) {
        point.color = color;
    }
    Ok(())
}
