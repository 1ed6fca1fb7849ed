//! Helpers shared by the integration tests.

#![allow(dead_code)]

use jelly_sim::{Point3D, String3D};
use rand::prelude::*;

/// Asserts that two points are within `tol` of each other.
pub fn assert_close(a: Point3D, b: Point3D, tol: f64) {
    assert!(a.distance(b) <= tol, "{a} and {b} are {} apart", a.distance(b));
}

/// A seeded generator, so that every run sees the same noise.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// The length of every segment of a string.
pub fn segment_lengths(s: &String3D) -> Vec<f64> {
    s.points().windows(2).map(|w| w[0].distance(w[1])).collect()
}

/// The `i`-th of `n` points evenly spaced on a circle of `radius` in the horizontal plane.
#[expect(clippy::cast_precision_loss)]
pub fn on_circle(i: usize, n: usize, radius: f64) -> Point3D {
    let (s, c) = (core::f64::consts::TAU * i as f64 / n as f64).sin_cos();
    Point3D::new(radius * c, radius * s, 0.0)
}
