//! The frame loop of a whole tank: jellies, then the hit map, then the swimmers.

use std::path::Path;

use jelly_sim::{DistanceField, Fish, HitMap, Jelly, Point3D, Shrimp, Swimmer, Terrain};
use rand::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use crate::scene::SceneConfig;

/// Summary statistics of one frame, written as one CSV row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameStats {
    /// The frame number, starting at `0`.
    pub frame: usize,
    /// The simulated time at the end of the frame.
    pub time: f64,
    /// The mean rim radius over all jellies.
    pub rim_radius: f64,
    /// The total kinetic energy of all bells.
    pub kinetic_energy: f64,
    /// The largest segment length error over all tentacles.
    pub max_length_error: f64,
    /// The number of swimmers that started the frame on a marked hit map cell.
    pub fleeing: usize,
    /// The number of swimmers whose move was vetoed by the tank walls.
    pub blocked: usize,
}

/// Everything in the tank.
pub struct Simulation {
    /// The jellies.
    jellies: Vec<Jelly>,
    /// The fish.
    fish: Vec<Fish>,
    /// The shrimp.
    shrimp: Vec<Shrimp>,
    /// The walls.
    tank: DistanceField,
    /// Cells near a jelly, rebuilt every frame.
    hit_map: HitMap,
    /// The period of a bell pulse.
    pulse_period: f64,
    /// The number of frames run so far.
    frame: usize,
    /// The simulated time.
    time: f64,
}

impl Simulation {
    /// Builds the tank and everything in it.
    ///
    /// # Errors
    ///
    /// If any part of the scene is invalid.
    pub fn new<R: Rng>(scene: &SceneConfig, rng: &mut R) -> Result<Self, String> {
        if !(scene.pulse_period.is_finite() && scene.pulse_period > 0.0) {
            return Err(format!("Pulse period must be positive, got {}", scene.pulse_period));
        }

        let tank = scene.build_tank()?;
        let jellies = scene.build_jellies()?;
        let (fish, shrimp) = scene.spawn_swimmers(&tank, rng)?;
        ftlog::info!(
            "Built a tank with {} jellies, {} fish and {} shrimp",
            jellies.len(),
            fish.len(),
            shrimp.len()
        );

        Ok(Self {
            jellies,
            fish,
            shrimp,
            tank,
            hit_map: scene.build_hit_map()?,
            pulse_period: scene.pulse_period,
            frame: 0,
            time: 0.0,
        })
    }

    /// The jellies.
    pub fn jellies(&self) -> &[Jelly] {
        &self.jellies
    }

    /// The hit map as marked in the last frame.
    pub const fn hit_map(&self) -> &HitMap {
        &self.hit_map
    }

    /// Runs one frame of `dt`.
    ///
    /// # Errors
    ///
    /// If a jelly diverged.
    #[expect(clippy::cast_precision_loss)]
    pub fn step<R: Rng>(&mut self, dt: f64, rng: &mut R) -> Result<FrameStats, String> {
        let num_jellies = self.jellies.len().max(1) as f64;
        let (time, period, tank) = (self.time, self.pulse_period, &self.tank);

        self.jellies.par_iter_mut().enumerate().for_each(|(i, jelly)| {
            // Stagger the pulses so the bells do not beat in step.
            let phase = i as f64 / num_jellies;
            jelly.update(dt, muscle(time / period + phase));
            jelly.collide(tank);
        });
        if let Some(i) = self.jellies.iter().position(|j| !j.is_finite()) {
            return Err(format!("Jelly {i} diverged at frame {}", self.frame));
        }

        self.hit_map.clear();
        for jelly in &self.jellies {
            for ps in jelly.point_strings() {
                self.hit_map.add_points(ps.string.points());
            }
            self.hit_map.add_points(&jelly.outer_points().iter().map(|p| p.p).collect::<Vec<_>>());
        }

        let centers = self.jellies.iter().map(Jelly::center).collect::<Vec<_>>();
        let (mut fleeing, mut blocked) = (0, 0);
        for fish in &mut self.fish {
            let (fled, moved) = swim(fish, dt, rng, &self.hit_map, &self.tank, &centers);
            fleeing += usize::from(fled);
            blocked += usize::from(!moved);
        }
        for shrimp in &mut self.shrimp {
            let (fled, moved) = swim(shrimp, dt, rng, &self.hit_map, &self.tank, &centers);
            fleeing += usize::from(fled);
            blocked += usize::from(!moved);
        }

        self.time += dt;
        let stats = FrameStats {
            frame: self.frame,
            time: self.time,
            rim_radius: self.jellies.iter().map(Jelly::rim_radius).sum::<f64>() / num_jellies,
            kinetic_energy: self.jellies.iter().map(Jelly::kinetic_energy).sum(),
            max_length_error: self
                .jellies
                .iter()
                .flat_map(Jelly::point_strings)
                .map(|ps| ps.string.max_length_error())
                .fold(0.0, f64::max),
            fleeing,
            blocked,
        };
        self.frame += 1;
        Ok(stats)
    }
}

/// The bell contraction at `cycles` pulses since the start, rising from `0` to `1` and back.
fn muscle(cycles: f64) -> f64 {
    0.5 - 0.5 * (core::f64::consts::TAU * cycles).cos()
}

/// Moves a swimmer for one frame: flee from the nearest jelly when standing on a marked cell, then
/// swim unless the tank wall is in the way.
///
/// Returns whether the swimmer fled and whether it moved.
fn swim<S: Swimmer, R: Rng>(
    swimmer: &mut S,
    dt: f64,
    rng: &mut R,
    hit_map: &HitMap,
    tank: &DistanceField,
    centers: &[Point3D],
) -> (bool, bool) {
    let position = swimmer.position();
    let fled = hit_map.hit_test(position.x, position.y);
    if fled {
        let nearest = centers
            .iter()
            .min_by(|a, b| a.distance(position).total_cmp(&b.distance(position)));
        if let Some(&center) = nearest {
            swimmer.flee(center);
        }
    }

    let moved = swimmer.update_2d(dt, rng, |x, y| tank.hit_test(x, y));
    swimmer.update_for_render(dt);
    (fled, moved)
}

/// Runs `frames` frames of the scene and writes one row of statistics per frame to `out_path`.
///
/// # Errors
///
/// - If the scene is invalid.
/// - If the output file could not be written.
/// - If a jelly diverged.
pub fn simulate<P: AsRef<Path>, R: Rng>(
    scene: &SceneConfig,
    frames: usize,
    dt: f64,
    out_path: P,
    rng: &mut R,
) -> Result<(), String> {
    let mut sim = Simulation::new(scene, rng)?;
    let mut writer = crate::utils::trace_writer(&out_path)?;

    for _ in 0..frames {
        let stats = sim.step(dt, rng)?;
        writer.serialize(stats).map_err(|e| e.to_string())?;
        if stats.frame % 100 == 0 {
            ftlog::info!(
                "Frame {}: rim radius {:.4}, kinetic energy {:.4}, {} fleeing",
                stats.frame,
                stats.rim_radius,
                stats.kinetic_energy,
                stats.fleeing
            );
        }
    }
    writer.flush().map_err(|e| e.to_string())?;

    ftlog::info!(
        "Wrote {frames} frames of {} jellies to {:?}, hit map generation {}",
        sim.jellies().len(),
        out_path.as_ref(),
        sim.hit_map().generation()
    );
    Ok(())
}
