//! A 3x3 rotation matrix.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Point3D;

/// A row-major 3x3 matrix, used for rotations and orientation frames.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mat3 {
    /// The rows of the matrix.
    pub rows: [[f64; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Creates a matrix whose columns are the given vectors.
    pub const fn from_columns(c0: Point3D, c1: Point3D, c2: Point3D) -> Self {
        Self {
            rows: [[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]],
        }
    }

    /// The rotation by `angle` radians around the unit vector `axis` (Rodrigues' formula).
    pub fn rotation(axis: Point3D, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Point3D { x, y, z } = axis;
        Self {
            rows: [
                [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
                [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
                [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
            ],
        }
    }

    /// An orthonormal frame whose third column is `forward` and whose second column is as close to `up`
    /// as possible.
    ///
    /// Falls back to another reference axis when `forward` is parallel to `up`. `forward` need not be
    /// normalized, but must be non-zero.
    pub fn look_along(forward: Point3D, up: Point3D) -> Self {
        let f = forward.normalize();
        let side = up.cross(f).try_normalize().unwrap_or_else(|| {
            let fallback = if f.x.abs() < 0.9 { Point3D::X } else { Point3D::Y };
            fallback.cross(f).normalize()
        });
        let u = f.cross(side);
        Self::from_columns(side, u, f)
    }

    /// Column `i` of the matrix.
    pub const fn column(&self, i: usize) -> Point3D {
        Point3D::new(self.rows[0][i], self.rows[1][i], self.rows[2][i])
    }

    /// The transpose, which is the inverse for rotation matrices.
    pub const fn transpose(&self) -> Self {
        Self::from_columns(
            Point3D::new(self.rows[0][0], self.rows[0][1], self.rows[0][2]),
            Point3D::new(self.rows[1][0], self.rows[1][1], self.rows[1][2]),
            Point3D::new(self.rows[2][0], self.rows[2][1], self.rows[2][2]),
        )
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, v: Point3D) -> Point3D {
        let row = |r: &[f64; 3]| r[0].mul_add(v.x, r[1].mul_add(v.y, r[2] * v.z));
        Point3D::new(row(&self.rows[0]), row(&self.rows[1]), row(&self.rows[2]))
    }

    /// Matrix-matrix product.
    pub fn mul_mat(&self, other: &Self) -> Self {
        Self::from_columns(
            self.mul_vec(other.column(0)),
            self.mul_vec(other.column(1)),
            self.mul_vec(other.column(2)),
        )
    }

    /// The determinant.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.column(0).dot(self.column(1).cross(self.column(2)))
    }
}
