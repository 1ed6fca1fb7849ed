//! Spatial queries shared by the simulators: tentacle occupancy and tank walls.

mod hit_map;
mod terrain;

pub use hit_map::HitMap;
pub use terrain::{DistanceField, Terrain};
