//! A single node of the jelly lattice.

use aquamath::Point3D;

/// A lattice node: fixed local coordinates and simulated state.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JellyCoord {
    /// Local distance from the lattice axis, `hypot(x, y)` with `x, y` in `[-1, 1]`.
    pub r: f64,
    /// Local polar angle around the lattice axis.
    pub th: f64,
    /// Local layer height, `0` or `1`.
    pub z: f64,
    /// Position.
    pub p: Point3D,
    /// Velocity.
    pub v: Point3D,
    /// Force accumulated during the current step.
    pub f: Point3D,
    /// The position the node is pulled toward in the current frame.
    pub dst: Point3D,
}

impl JellyCoord {
    /// A node at local `(x, y, z)`, at rest on its destination for time `0`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let (r, th) = (x.hypot(y), y.atan2(x));
        let dst = super::jelly_destination(r, th, 0.0, z);
        Self {
            r,
            th,
            z,
            p: dst,
            v: Point3D::ZERO,
            f: Point3D::ZERO,
            dst,
        }
    }

    /// The local cartesian coordinates of the node.
    pub fn local(&self) -> Point3D {
        let (s, c) = self.th.sin_cos();
        Point3D::new(self.r * c, self.r * s, self.z)
    }
}
