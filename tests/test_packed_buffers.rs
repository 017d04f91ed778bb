//! Integration tests: renderer-facing buffer packing
//!
//! Verifies the fixed record layout, neighbor round trips through the
//! direction/length encoding, truncation reporting, and snapshot reuse.
//!
//! Author: Moroya Sakamoto

mod common;

use common::*;
use glam::Vec3;
use lumen_vol::prelude::*;

#[test]
fn packed_record_layout_is_stable() {
    assert_eq!(std::mem::size_of::<PackedLightPoint>(), 464);
    assert_eq!(MAX_NEIGHBORS, 27);
}

#[test]
fn neighbor_slots_round_trip_through_pipeline() {
    let mut volume = LightVolume::new(VolumeConfig {
        step_size: 1.0,
        ext_step_count: 1,
        grid_bounds: Aabb::new(Vec3::splat(-3.0), Vec3::splat(6.0)),
        grid_cell_size: 2.0,
        ..Default::default()
    });
    volume.regenerate(&[floor_quad(3.0)]).unwrap();

    let buffers = volume.packed().unwrap().clone();
    let points = volume.points();
    assert_eq!(buffers.points.len(), points.len());

    for (point, record) in points.iter().zip(&buffers.points) {
        let expected = point.neighbors.len().min(MAX_NEIGHBORS);
        assert_eq!(record.neighbor_count as usize, expected);
        assert_vec3_close(
            Vec3::from_array(record.position),
            point.position,
            1.0e-6,
            "Position copies through",
        );
        assert_close(
            record.radius,
            point.influence_radius,
            1.0e-6,
            "Radius copies through",
        );

        for (slot, original) in point.neighbors.iter().take(MAX_NEIGHBORS).enumerate() {
            let [x, y, z, len] = record.neighbors[slot];
            assert_close(
                Vec3::new(x, y, z).length(),
                1.0,
                1.0e-4,
                "Stored directions are unit length",
            );
            assert_vec3_close(
                Vec3::new(x, y, z) * len,
                *original,
                1.0e-4,
                "direction * length rebuilds the neighbor vector",
            );
        }
    }
}

#[test]
fn truncation_surfaces_in_stats() {
    // A cluster of 30 points inside one neighbor radius: 29 neighbors each
    let mut points: Vec<LightPoint> = (0..30)
        .map(|i| {
            LightPoint::new(
                Vec3::new((i % 6) as f32 * 0.01, (i / 6) as f32 * 0.01, 0.0),
                0.0,
            )
        })
        .collect();
    link_neighbors(&mut points, 1.1);

    let grid = build_grid(Aabb::new(Vec3::splat(-1.0), Vec3::ONE), 2.0, &points).unwrap();
    let buffers = pack_buffers(&points, &grid);

    assert_eq!(buffers.stats.truncated_points, 30);
    assert_eq!(buffers.stats.max_neighbor_count, 29);
    for record in &buffers.points {
        assert_eq!(record.neighbor_count, MAX_NEIGHBORS as u32);
    }
}

#[test]
fn no_truncation_on_regular_lattices() {
    let mut volume = LightVolume::new(VolumeConfig {
        step_size: 1.0,
        ext_step_count: 1,
        grid_bounds: Aabb::new(Vec3::splat(-3.0), Vec3::splat(6.0)),
        grid_cell_size: 2.0,
        ..Default::default()
    });
    volume.regenerate(&[floor_quad(3.0)]).unwrap();

    let buffers = volume.packed().unwrap();
    assert_eq!(
        buffers.stats.truncated_points, 0,
        "A unit lattice never reaches 27 neighbors"
    );
}

#[test]
fn grid_metadata_copies_bounds_and_dims() {
    let bounds = Aabb::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 2.0, 2.0));
    let mut volume = LightVolume::new(VolumeConfig {
        step_size: 1.0,
        ext_step_count: 0,
        grid_bounds: bounds,
        grid_cell_size: 1.0,
        ..Default::default()
    });
    volume.regenerate(&[floor_quad(2.0)]).unwrap();

    let grid_cells = volume.grid().unwrap().cells.clone();
    let buffers = volume.packed().unwrap();

    assert_eq!(buffers.bounds_min, bounds.min.to_array());
    assert_eq!(buffers.bounds_max, bounds.max.to_array());
    assert_eq!(buffers.grid_dims, [4, 2, 4]);
    assert_eq!(buffers.grid_cells, grid_cells, "Cell words copy verbatim");
}

#[test]
fn byte_views_match_buffer_sizes() {
    let mut volume = LightVolume::new(VolumeConfig {
        step_size: 1.0,
        ext_step_count: 0,
        grid_bounds: Aabb::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 2.0)),
        grid_cell_size: 1.0,
        ..Default::default()
    });
    volume.regenerate(&[floor_quad(2.0)]).unwrap();

    let buffers = volume.packed().unwrap();
    assert_eq!(buffers.point_bytes().len(), buffers.points.len() * 464);
    assert_eq!(
        buffers.grid_cell_bytes().len(),
        buffers.grid_cells.len() * 4
    );
    assert_eq!(
        buffers.point_index_bytes().len(),
        buffers.point_indices.len() * 4
    );
}
