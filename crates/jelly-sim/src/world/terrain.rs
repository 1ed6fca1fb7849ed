//! The walls of the tank.

use aquamath::{Point3D, interpolate};

/// Blocked regions of the horizontal plane.
pub trait Terrain {
    /// Whether `(x, y)` is inside a wall.
    fn hit_test(&self, x: f64, y: f64) -> bool;

    /// The unit normal of the nearest wall at `(x, y)`, pointing toward open water, if one is defined
    /// there.
    fn hit_normal(&self, x: f64, y: f64) -> Option<Point3D>;
}

/// A signed distance field sampled on a square grid centered on the origin.
///
/// Positive values are open water and negative values are inside walls. Between samples the field is
/// interpolated bilinearly, and outside the grid it takes the value of the nearest border.
#[must_use]
#[derive(Debug, Clone)]
pub struct DistanceField {
    /// The number of cells along each side.
    resolution: usize,
    /// Half the side length of the sampled square.
    half_extent: f64,
    /// The `(resolution + 1)²` samples, row by row.
    values: Vec<f64>,
}

impl DistanceField {
    /// Samples `distance` on a `resolution × resolution` grid of cells covering
    /// `[-half_extent, half_extent]²`.
    ///
    /// # Errors
    ///
    /// - If `resolution` is zero.
    /// - If `half_extent` is not a positive finite number.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_fn<F: Fn(f64, f64) -> f64>(half_extent: f64, resolution: usize, distance: F) -> Result<Self, String> {
        if resolution == 0 {
            return Err("A DistanceField needs at least one cell.".to_string());
        }
        if !(half_extent.is_finite() && half_extent > 0.0) {
            return Err(format!("Half extent must be positive and finite, got {half_extent}."));
        }
        let spacing = 2.0 * half_extent / resolution as f64;
        let at = |i: usize| (i as f64).mul_add(spacing, -half_extent);
        let values = (0..=resolution)
            .flat_map(|j| (0..=resolution).map(move |i| (i, j)))
            .map(|(i, j)| distance(at(i), at(j)))
            .collect();
        ftlog::debug!("Sampled a {resolution}x{resolution} DistanceField over half extent {half_extent}");
        Ok(Self {
            resolution,
            half_extent,
            values,
        })
    }

    /// A round tank of `radius` around the origin.
    ///
    /// # Errors
    ///
    /// See [`DistanceField::from_fn`].
    pub fn round_tank(radius: f64, resolution: usize) -> Result<Self, String> {
        Self::from_fn(radius * 1.25, resolution, |x, y| radius - x.hypot(y))
    }

    /// The distance between samples.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn spacing(&self) -> f64 {
        2.0 * self.half_extent / self.resolution as f64
    }

    /// The interpolated signed distance at `(x, y)`.
    #[must_use]
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        let to_grid = |v: f64| (v + self.half_extent) / self.spacing();
        let (i, tx) = interpolate::cell_and_offset(to_grid(x), self.resolution);
        let (j, ty) = interpolate::cell_and_offset(to_grid(y), self.resolution);
        let (tx, ty) = (tx.clamp(0.0, 1.0), ty.clamp(0.0, 1.0));

        let side = self.resolution + 1;
        let v = |i: usize, j: usize| self.values[j * side + i];
        let bottom = v(i, j) + (v(i + 1, j) - v(i, j)) * tx;
        let top = v(i, j + 1) + (v(i + 1, j + 1) - v(i, j + 1)) * tx;
        bottom + (top - bottom) * ty
    }
}

impl Terrain for DistanceField {
    fn hit_test(&self, x: f64, y: f64) -> bool {
        self.distance(x, y) < 0.0
    }

    /// The normalized central-difference gradient of the field, one sample apart.
    fn hit_normal(&self, x: f64, y: f64) -> Option<Point3D> {
        let h = self.spacing();
        let gx = self.distance(x + h, y) - self.distance(x - h, y);
        let gy = self.distance(x, y + h) - self.distance(x, y - h);
        Point3D::new(gx, gy, 0.0).try_normalize()
    }
}
