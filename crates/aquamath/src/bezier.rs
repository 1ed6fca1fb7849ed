//! Cubic bezier curves with an arc-length parameterization.

use crate::Point3D;

/// A cubic bezier curve through four control points.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// The control points. The curve starts at `points[0]` and ends at `points[3]`.
    pub points: [Point3D; 4],
}

impl CubicBezier {
    /// Creates a new curve.
    pub const fn new(p0: Point3D, p1: Point3D, p2: Point3D, p3: Point3D) -> Self {
        Self { points: [p0, p1, p2, p3] }
    }

    /// The point at parameter `t ∈ [0, 1]`.
    pub fn point(&self, t: f64) -> Point3D {
        let u = 1.0 - t;
        let [p0, p1, p2, p3] = self.points;
        p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
    }

    /// The first derivative with respect to `t`.
    pub fn derivative(&self, t: f64) -> Point3D {
        let u = 1.0 - t;
        let [p0, p1, p2, p3] = self.points;
        (p1 - p0) * (3.0 * u * u) + (p2 - p1) * (6.0 * u * t) + (p3 - p2) * (3.0 * t * t)
    }

    /// Cumulative chord lengths at `resolution + 1` evenly spaced parameter values.
    #[expect(clippy::cast_precision_loss)]
    fn length_table(&self, resolution: usize) -> Vec<f64> {
        let resolution = resolution.max(1);
        let mut table = Vec::with_capacity(resolution + 1);
        let mut total = 0.0;
        let mut prev = self.point(0.0);
        table.push(0.0);
        for i in 1..=resolution {
            let p = self.point(i as f64 / resolution as f64);
            total += prev.distance(p);
            table.push(total);
            prev = p;
        }
        table
    }

    /// The approximate arc length, using a chord approximation with `resolution` pieces.
    #[must_use]
    pub fn length(&self, resolution: usize) -> f64 {
        self.length_table(resolution).last().copied().unwrap_or(0.0)
    }

    /// Parameter values that split the curve into `count - 1` pieces of (approximately) equal arc
    /// length. The first value is `0` and the last is `1`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn arc_length_params(&self, count: usize, resolution: usize) -> Vec<f64> {
        if count < 2 {
            return vec![0.0; count];
        }
        let table = self.length_table(resolution);
        let steps = table.len() - 1;
        let total = table[steps];
        if total <= 0.0 {
            return (0..count).map(|i| i as f64 / (count - 1) as f64).collect();
        }

        let mut params = Vec::with_capacity(count);
        let mut j = 0;
        for i in 0..count {
            let target = total * i as f64 / (count - 1) as f64;
            while j + 1 < steps && table[j + 1] < target {
                j += 1;
            }
            let span = table[j + 1] - table[j];
            let frac = if span > 0.0 { ((target - table[j]) / span).clamp(0.0, 1.0) } else { 0.0 };
            params.push((j as f64 + frac) / steps as f64);
        }
        params
    }

    /// Points spaced at (approximately) equal arc length along the curve.
    #[must_use]
    pub fn sample_uniform(&self, count: usize, resolution: usize) -> Vec<Point3D> {
        self.arc_length_params(count, resolution)
            .into_iter()
            .map(|t| self.point(t))
            .collect()
    }
}
