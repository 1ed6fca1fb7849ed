//! Soft-body simulation core for a jellyfish aquarium.
//!
//! The host calls `update` on every simulator once per animation frame and then reads positions,
//! directions and normals back for rendering. Everything here is synchronous and deterministic for a
//! given input and random seed.
//!
//! ## Simulators
//!
//! - [`String3D`]: a chain of fixed-length segments (an inextensible rod) solved with one tridiagonal
//!   tension system per step, and [`Ribbon`], a relaxed normal frame that follows a string.
//! - [`Jelly`]: a bell made of point masses and spring-dampers, pulsed by a `muscle` input, with
//!   tentacles coupled to its rim points in both directions.
//! - [`JellyGrid`]: a two-layer lattice pulled toward an analytic swimming shape, with a cubic blend
//!   that deforms arbitrary mesh vertices.
//! - [`Fish`] and [`Shrimp`]: steered agents implementing [`Swimmer`].
//!
//! ## World queries
//!
//! - [`HitMap`]: a generation-stamped occupancy grid.
//! - [`Terrain`] and [`DistanceField`]: hit-tests and normals for the walls of the tank.
//!
//! ## Features
//!
//! - `serde`: Enables serialization and deserialization of the configuration structs.

mod grid;
mod jelly;
mod string;
mod swimmer;
mod world;

pub use aquamath::{Mat3, Point3D};

pub use grid::{GRID_TIME_STEP, JellyCoord, JellyGrid, jelly_destination};
pub use jelly::{HardnessParam, Jelly, JellyLink, JellyPoint, JellyShape, PointString, TentacleParam};
pub use string::{Constraints, Ribbon, StepOutput, String3D};
pub use swimmer::{Fish, Shrimp, SwimBody, SwimParams, Swimmer};
pub use world::{DistanceField, HitMap, Terrain};
