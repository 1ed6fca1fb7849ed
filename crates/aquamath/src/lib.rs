//! Vector, matrix and interpolation helpers for soft-body simulation.
//!
//! - [`Point3D`]: a plain 3D vector with value semantics.
//! - [`Mat3`]: a 3x3 rotation matrix.
//! - [`solve_tridiagonal`]: the Thomas algorithm for tridiagonal linear systems.
//! - [`CubicBezier`]: a cubic bezier curve with an arc-length parameterization.
//! - [`interpolate`]: smoothstep and cubic Hermite basis functions.
//!
//! ## Features
//!
//! - `serde`: Derives `Serialize` and `Deserialize` for [`Point3D`] and [`Mat3`].

mod bezier;
pub mod interpolate;
mod matrix;
mod point;
mod tridiagonal;

pub use bezier::CubicBezier;
pub use matrix::Mat3;
pub use point::Point3D;
pub use tridiagonal::solve_tridiagonal;
