//! Scene files that describe what the `simulate` command puts in the tank.

use std::path::Path;

use jelly_sim::{
    DistanceField, Fish, HardnessParam, HitMap, Jelly, JellyShape, Point3D, Shrimp, SwimParams, TentacleParam,
};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// The tentacles attached below every outer ring point of a jelly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TentacleConfig {
    /// Segments per tentacle.
    pub num_segments: usize,
    /// The length of each tentacle.
    pub length: f64,
    /// The inverse mass of the tentacle points below the anchor.
    pub weight: f64,
    /// The forces applied to the tentacles.
    pub param: TentacleParam,
}

impl Default for TentacleConfig {
    fn default() -> Self {
        Self {
            num_segments: 12,
            length: 1.5,
            weight: 10.0,
            param: TentacleParam::default(),
        }
    }
}

/// Everything needed to build a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// The number of jellies.
    pub num_jellies: usize,
    /// The number of fish.
    pub num_fish: usize,
    /// The number of shrimp.
    pub num_shrimp: usize,
    /// The shape of every jelly bell.
    pub shape: JellyShape,
    /// The link stiffness of every jelly bell.
    pub hardness: HardnessParam,
    /// Tentacles, or `None` for bare bells.
    pub tentacles: Option<TentacleConfig>,
    /// The period of a bell pulse.
    pub pulse_period: f64,
    /// Steering parameters for the fish.
    pub fish: SwimParams,
    /// Steering parameters for the shrimp.
    pub shrimp: SwimParams,
    /// The radius of the round tank.
    pub tank_radius: f64,
    /// Samples along each side of the tank's distance field.
    pub tank_resolution: usize,
    /// Cells along each side of the hit map.
    pub hit_map_size: usize,
    /// The marking radius of the hit map, in cells.
    pub hit_map_radius: usize,
    /// The side length of a hit map cell.
    pub hit_map_cell_size: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            num_jellies: 3,
            num_fish: 8,
            num_shrimp: 12,
            shape: JellyShape::default().scaled(0.3),
            hardness: HardnessParam::default(),
            tentacles: Some(TentacleConfig {
                length: 0.6,
                ..TentacleConfig::default()
            }),
            pulse_period: 2.0,
            fish: SwimParams::default(),
            shrimp: SwimParams::default().with_speed(0.2).with_body_length(0.1),
            tank_radius: 4.0,
            tank_resolution: 128,
            hit_map_size: 256,
            hit_map_radius: 2,
            hit_map_cell_size: 1.0 / 32.0,
        }
    }
}

impl SceneConfig {
    /// Reads a scene from a JSON or YAML file, chosen by the file extension.
    ///
    /// # Errors
    ///
    /// - If the file could not be read.
    /// - If the extension is not `json`, `yaml` or `yml`.
    /// - If the contents could not be deserialized.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|e| e.to_string()),
            Some("yaml" | "yml") => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
            _ => Err(format!("Unsupported scene file {}, expected .json, .yaml or .yml", path.display())),
        }
    }

    /// Builds the jellies, spaced evenly on a circle at half the tank radius.
    ///
    /// # Errors
    ///
    /// If the shape or the tentacles are invalid.
    pub fn build_jellies(&self) -> Result<Vec<Jelly>, String> {
        let ring = self.tank_radius * 0.5;
        (0..self.num_jellies)
            .map(|i| {
                let mut jelly = Jelly::new(self.shape, &self.hardness)?;
                let offset = on_circle(i, self.num_jellies, ring);
                for p in jelly.points_mut() {
                    p.p += offset;
                }
                if let Some(t) = &self.tentacles {
                    jelly = jelly.with_tentacle_param(t.param);
                    jelly.attach_tentacles(t.num_segments, t.length, t.weight)?;
                }
                Ok(jelly)
            })
            .collect()
    }

    /// Spawns the fish and shrimp at random open positions inside the tank.
    ///
    /// # Errors
    ///
    /// If no open position is found for a swimmer.
    pub fn spawn_swimmers<R: Rng>(&self, tank: &DistanceField, rng: &mut R) -> Result<(Vec<Fish>, Vec<Shrimp>), String> {
        let fish = (0..self.num_fish)
            .map(|_| {
                let spawn = self.open_position(tank, rng)?;
                Ok(Fish::new(spawn, rng.random_range(-core::f64::consts::PI..core::f64::consts::PI), self.fish))
            })
            .collect::<Result<Vec<_>, String>>()?;
        let shrimp = (0..self.num_shrimp)
            .map(|_| {
                let spawn = self.open_position(tank, rng)?;
                Ok(Shrimp::new(spawn, rng.random_range(-core::f64::consts::PI..core::f64::consts::PI), self.shrimp))
            })
            .collect::<Result<Vec<_>, String>>()?;
        Ok((fish, shrimp))
    }

    /// Builds the walls of the tank.
    ///
    /// # Errors
    ///
    /// If the radius or resolution is invalid.
    pub fn build_tank(&self) -> Result<DistanceField, String> {
        DistanceField::round_tank(self.tank_radius, self.tank_resolution)
    }

    /// Builds an empty hit map.
    ///
    /// # Errors
    ///
    /// If the size or cell size is invalid.
    pub fn build_hit_map(&self) -> Result<HitMap, String> {
        HitMap::new(self.hit_map_size, self.hit_map_radius)?.with_cell_size(self.hit_map_cell_size)
    }

    /// A random point inside the tank that is at least a little away from the walls.
    fn open_position<R: Rng>(&self, tank: &DistanceField, rng: &mut R) -> Result<Point3D, String> {
        let r = self.tank_radius;
        for _ in 0..1000 {
            let (x, y) = (rng.random_range(-r..r), rng.random_range(-r..r));
            if tank.distance(x, y) > 0.1 * r {
                return Ok(Point3D::new(x, y, 0.0));
            }
        }
        Err(format!("Found no open position in a tank of radius {r}"))
    }
}

/// Point `i` of `n` evenly spaced on a horizontal circle of `radius`.
#[expect(clippy::cast_precision_loss)]
fn on_circle(i: usize, n: usize, radius: f64) -> Point3D {
    let angle = core::f64::consts::TAU * i as f64 / n as f64;
    Point3D::new(radius * angle.cos(), radius * angle.sin(), 0.0)
}
