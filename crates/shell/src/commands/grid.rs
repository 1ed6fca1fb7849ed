//! A lattice bell deforming a fixed cloud of mesh vertices.

use std::path::Path;

use jelly_sim::{GRID_TIME_STEP, JellyGrid, Point3D};
use rand::prelude::*;
use serde::Serialize;

/// The lattice and the deformed vertices after one frame, written as one CSV row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridStats {
    /// The frame number, starting at `0`.
    pub frame: usize,
    /// The time passed to the lattice.
    pub time: f64,
    /// The largest distance from a lattice node to its destination.
    pub max_lag: f64,
    /// The mean horizontal distance of the deformed vertices from the axis.
    pub mean_radius: f64,
    /// The lowest deformed vertex.
    pub min_z: f64,
    /// The highest deformed vertex.
    pub max_z: f64,
}

/// Random local coordinates inside the lattice box.
fn sample_locals<R: Rng>(samples: usize, rng: &mut R) -> Vec<Point3D> {
    (0..samples)
        .map(|_| {
            Point3D::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                rng.random_range(0.0..=1.0),
            )
        })
        .collect()
}

/// Summarizes the lattice and the vertices deformed by it.
#[expect(clippy::cast_precision_loss)]
fn summarize(frame: usize, grid: &JellyGrid, vertices: &[Point3D]) -> GridStats {
    let max_lag = grid.coords().iter().map(|c| c.p.distance(c.dst)).fold(0.0, f64::max);
    let mean_radius = vertices.iter().map(|v| v.x.hypot(v.y)).sum::<f64>() / vertices.len().max(1) as f64;
    let (min_z, max_z) = vertices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v.z), hi.max(v.z)));
    GridStats {
        frame,
        time: grid.time(),
        max_lag,
        mean_radius,
        min_z,
        max_z,
    }
}

/// Runs `frames` frames of a lattice with `segments` segments per side, deforming `samples` random
/// vertices every frame, and writes one row per frame to `out_path`.
///
/// # Errors
///
/// - If the lattice could not be built.
/// - If the output file could not be written.
/// - If the lattice diverged.
#[expect(clippy::cast_precision_loss)]
pub fn deform_grid<P: AsRef<Path>, R: Rng>(
    frames: usize,
    segments: usize,
    samples: usize,
    out_path: P,
    rng: &mut R,
) -> Result<(), String> {
    let mut grid = JellyGrid::new(segments)?;
    let locals = sample_locals(samples, rng);
    let mut writer = crate::utils::trace_writer(&out_path)?;
    ftlog::info!("Deforming {samples} vertices with a {segments}x{segments} lattice for {frames} frames");

    for frame in 0..frames {
        grid.update(frame as f64 * GRID_TIME_STEP);
        if !grid.is_finite() {
            return Err(format!("Lattice diverged at frame {frame}"));
        }
        let vertices = grid.par_transform_grid_points(&locals);
        writer
            .serialize(summarize(frame, &grid, &vertices))
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;

    ftlog::info!("Wrote {frames} frames to {:?}", out_path.as_ref());
    Ok(())
}
