//! LUMEN-VOL CLI
//!
//! Command-line interface for running the bake pipeline on a built-in
//! demo scene and inspecting the resulting buffers.
//!
//! Author: Moroya Sakamoto

use clap::{Parser, Subcommand};
use glam::Vec3;
use lumen_vol::prelude::*;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lumen-vol")]
#[command(author = "Moroya Sakamoto")]
#[command(version = lumen_vol::VERSION)]
#[command(about = "LUMEN-VOL: volumetric light-point baking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on the demo scene and print diagnostics
    Demo {
        /// Lattice step size
        #[arg(short, long, default_value = "1.0")]
        step: f32,
        /// Extension ring count
        #[arg(short, long, default_value = "5")]
        ext: u32,
        /// Grid cell size
        #[arg(short, long, default_value = "1.0")]
        cell: f32,
    },

    /// Time each pipeline stage on the demo scene
    Bench {
        /// Lattice step size
        #[arg(short, long, default_value = "0.5")]
        step: f32,
        /// Extension ring count
        #[arg(short, long, default_value = "3")]
        ext: u32,
    },
}

/// A floor and a back wall inside the default grid bounds
fn demo_patches() -> Vec<PatchQuad> {
    vec![
        PatchQuad::new(
            Vec3::new(-4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, -4.0),
            Vec3::new(-4.0, 0.0, 4.0),
            Vec3::new(4.0, 0.0, 4.0),
        ),
        PatchQuad::new(
            Vec3::new(-4.0, 0.0, 4.0),
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(-4.0, 3.0, 4.0),
            Vec3::new(4.0, 3.0, 4.0),
        ),
    ]
}

fn demo_lights() -> Vec<Light> {
    vec![
        Light::Directional {
            direction: Vec3::new(0.3, -1.0, 0.2).normalize(),
            color: Vec3::new(1.0, 0.95, 0.8),
        },
        Light::RectArea {
            position: Vec3::new(0.0, 2.5, 0.0),
            forward: Vec3::NEG_Y,
            color: Vec3::new(0.9, 0.3, 0.2),
            range: 6.0,
        },
    ]
}

fn demo_config(step: f32, ext: u32, cell: f32) -> VolumeConfig {
    VolumeConfig {
        step_size: step,
        ext_step_count: ext,
        grid_cell_size: cell,
        ..Default::default()
    }
}

fn run_demo(step: f32, ext: u32, cell: f32) {
    let mut volume = LightVolume::new(demo_config(step, ext, cell));

    let stats = match volume.regenerate(&demo_patches()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Regeneration failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Regenerated:");
    println!("  Generated: {}", stats.generated);
    println!("  Deduplicated: {}", stats.deduplicated);
    println!("  Points: {}", stats.point_count);
    println!("  Degenerate patches: {}", stats.degenerate_patches);
    println!("  Largest nearby count: {}", stats.largest_neighbor_count);
    println!(
        "  Grid: max {} / avg {:.2} points per cell",
        stats.grid.max_per_cell, stats.grid.avg_per_cell
    );

    if let Err(e) = volume.bake(&demo_lights(), &NoOcclusion) {
        eprintln!("Bake failed: {}", e);
        std::process::exit(1);
    }

    let buffers = match volume.packed() {
        Some(buffers) => buffers,
        None => {
            eprintln!("No buffers after regeneration");
            std::process::exit(1);
        }
    };

    println!("Packed buffers:");
    println!(
        "  Points: {} records, {} bytes",
        buffers.points.len(),
        buffers.point_bytes().len()
    );
    println!(
        "  Grid: {}x{}x{} cells, {} bytes",
        buffers.grid_dims[0],
        buffers.grid_dims[1],
        buffers.grid_dims[2],
        buffers.grid_cell_bytes().len()
    );
    println!(
        "  Point indices: {} entries, {} bytes",
        buffers.point_indices.len(),
        buffers.point_index_bytes().len()
    );
    if buffers.stats.truncated_points > 0 {
        println!(
            "  Truncated: {} points over the {} neighbor slots (largest: {})",
            buffers.stats.truncated_points,
            MAX_NEIGHBORS,
            buffers.stats.max_neighbor_count
        );
    }
}

fn run_bench(step: f32, ext: u32) {
    let mut volume = LightVolume::new(demo_config(step, ext, 1.0));

    let start = Instant::now();
    let stats = match volume.regenerate(&demo_patches()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Regeneration failed: {}", e);
            std::process::exit(1);
        }
    };
    let regen = start.elapsed();

    let start = Instant::now();
    if let Err(e) = volume.bake(&demo_lights(), &NoOcclusion) {
        eprintln!("Bake failed: {}", e);
        std::process::exit(1);
    }
    let bake = start.elapsed();

    let start = Instant::now();
    let _ = volume.packed();
    let pack = start.elapsed();

    println!("Pipeline timings ({} points):", stats.point_count);
    println!("  Regenerate: {:.3}s", regen.as_secs_f64());
    println!("  Bake: {:.3}s", bake.as_secs_f64());
    println!("  Pack: {:.3}s", pack.as_secs_f64());
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { step, ext, cell } => run_demo(step, ext, cell),
        Commands::Bench { step, ext } => run_bench(step, ext),
    }
}
