//! A single tentacle dragged behind an anchor that sways back and forth.

use std::path::Path;

use jelly_sim::{Constraints, Point3D, Ribbon, String3D, TentacleParam};
use serde::Serialize;

/// How far the anchor sways along `x`.
const SWAY: f64 = 0.5;
/// How fast the anchor sways, in radians per unit time.
const SWAY_RATE: f64 = 2.0;
/// The relax rate of the ribbon frame.
const RIBBON_RELAX: f64 = 0.5;

/// The state of the tentacle after one frame, written as one CSV row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TentacleStats {
    /// The frame number, starting at `0`.
    pub frame: usize,
    /// The simulated time at the end of the frame.
    pub time: f64,
    /// The free end.
    pub tip_x: f64,
    /// The free end.
    pub tip_y: f64,
    /// The free end.
    pub tip_z: f64,
    /// The largest segment length error.
    pub max_length_error: f64,
    /// The force the tentacle exerts on the anchor.
    pub reaction_x: f64,
    /// The force the tentacle exerts on the anchor.
    pub reaction_y: f64,
    /// The force the tentacle exerts on the anchor.
    pub reaction_z: f64,
    /// The largest component of a ribbon normal along its segment.
    pub ribbon_skew: f64,
}

/// The anchor position at `time`.
fn anchor(time: f64) -> Point3D {
    Point3D::new(SWAY * (SWAY_RATE * time).sin(), 0.0, 0.0)
}

/// Steps the tentacle once with its anchor pinned at `target`.
fn step(tentacle: &mut String3D, ribbon: &mut Ribbon, param: &TentacleParam, dt: f64, target: Point3D) -> (Point3D, f64) {
    tentacle.add_hardness_force(param.hardness, param.decay);
    tentacle.add_force(param.gravity, param.friction);
    let out = tentacle.update(dt, &Constraints::pinned(target));
    let reaction = out.first.map_or(Point3D::ZERO, |f| -f);

    ribbon.update(Point3D::Y, tentacle.directions(), RIBBON_RELAX);
    let skew = ribbon
        .normals()
        .iter()
        .zip(tentacle.directions())
        .map(|(n, d)| n.dot(*d).abs())
        .fold(0.0, f64::max);
    (reaction, skew)
}

/// Runs `frames` frames of a tentacle with `num_segments` segments and writes one row per frame to
/// `out_path`.
///
/// # Errors
///
/// - If the tentacle could not be built.
/// - If the output file could not be written.
/// - If the tentacle diverged.
pub fn drag_tentacle<P: AsRef<Path>>(frames: usize, dt: f64, num_segments: usize, out_path: P) -> Result<(), String> {
    let param = TentacleParam::default();
    let mut tentacle = String3D::new(num_segments, 2.0, 1.0, 1.0)?;
    let mut ribbon = Ribbon::new(num_segments + 1);
    let mut writer = crate::utils::trace_writer(&out_path)?;
    ftlog::info!("Dragging a tentacle with {num_segments} segments for {frames} frames");

    let mut time = 0.0;
    for frame in 0..frames {
        time += dt;
        let (reaction, ribbon_skew) = step(&mut tentacle, &mut ribbon, &param, dt, anchor(time));
        if !tentacle.is_finite() {
            return Err(format!("Tentacle diverged at frame {frame}"));
        }

        let tip = tentacle.end();
        writer
            .serialize(TentacleStats {
                frame,
                time,
                tip_x: tip.x,
                tip_y: tip.y,
                tip_z: tip.z,
                max_length_error: tentacle.max_length_error(),
                reaction_x: reaction.x,
                reaction_y: reaction.y,
                reaction_z: reaction.z,
                ribbon_skew,
            })
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;

    ftlog::info!("Wrote {frames} frames to {:?}", out_path.as_ref());
    Ok(())
}
