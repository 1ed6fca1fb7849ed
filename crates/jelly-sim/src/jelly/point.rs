//! Point masses and the links between them.

use aquamath::Point3D;

use crate::String3D;

/// A unit point mass of a jelly bell.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JellyPoint {
    /// Position.
    pub p: Point3D,
    /// Velocity.
    pub v: Point3D,
    /// Force accumulated during the current step.
    pub f: Point3D,
}

impl JellyPoint {
    /// A point at rest at `p`.
    pub const fn at(p: Point3D) -> Self {
        Self {
            p,
            v: Point3D::ZERO,
            f: Point3D::ZERO,
        }
    }

    /// One symplectic Euler step: velocity from the force, then position from the new velocity.
    pub(crate) fn integrate(&mut self, dt: f64) {
        self.v += self.f * dt;
        self.p += self.v * dt;
    }
}

/// A spring-damper between points `a` and `b`.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JellyLink {
    /// Index of the first point.
    pub a: usize,
    /// Index of the second point.
    pub b: usize,
    /// Rest length, taken from the geometry at construction.
    pub r: f64,
    /// Stiffness.
    pub k: f64,
}

impl JellyLink {
    /// A link whose rest length is the current distance between the two points.
    pub(crate) fn between(points: &[JellyPoint], a: usize, b: usize, k: f64) -> Self {
        Self {
            a,
            b,
            r: points[a].p.distance(points[b].p),
            k,
        }
    }

    /// Adds the spring-damper force of this link to its two points.
    ///
    /// The relative length deviation blends the relaxed target `r` (weight `1 - muscle`) with the
    /// contracted target `r * ratio` (weight `muscle`). The damping term is proportional to the full
    /// relative velocity.
    pub(crate) fn apply(&self, points: &mut [JellyPoint], ratio: f64, muscle: f64) {
        let (pa, pb) = (points[self.a], points[self.b]);
        let delta = pb.p - pa.p;
        let distance = delta.length();
        let deviation = (1.0 - muscle) * (distance - self.r) / self.r + muscle * (distance - self.r * ratio) / self.r;
        let f = delta / distance * (self.k * deviation) + (pb.v - pa.v) * (self.k / 2.0);
        points[self.a].f += f;
        points[self.b].f -= f;
    }
}

/// A string whose first point is attached to a jelly point.
#[must_use]
#[derive(Debug, Clone)]
pub struct PointString {
    /// Index of the anchoring jelly point.
    pub point: usize,
    /// The attached string.
    pub string: String3D,
}
