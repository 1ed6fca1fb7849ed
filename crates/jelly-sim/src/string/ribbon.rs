//! A relaxed normal frame attached to a string.

use aquamath::Point3D;

/// One unit normal per string point, propagated from a seed at the first point.
///
/// The frame approximates parallel transport: each normal is the previous one projected onto the
/// plane perpendicular to the local tangent, then blended with its own value from the previous frame
/// to damp jitter. The normals are only approximately orthogonal to the string.
#[must_use]
#[derive(Debug, Clone)]
pub struct Ribbon {
    /// The unit normal at each point.
    normals: Vec<Point3D>,
}

impl Ribbon {
    /// Creates a ribbon for a string with `num_points` points, with every normal set to `x`.
    pub fn new(num_points: usize) -> Self {
        Self {
            normals: vec![Point3D::X; num_points],
        }
    }

    /// The normals, one per string point.
    #[must_use]
    pub fn normals(&self) -> &[Point3D] {
        &self.normals
    }

    /// Resets every normal to `v`.
    pub fn fill(&mut self, v: Point3D) {
        self.normals.fill(v);
    }

    /// Propagates the frame along a string.
    ///
    /// # Arguments
    ///
    /// - `seed`: The normal at the first point. It is made perpendicular to the first segment.
    /// - `directions`: The unit segment directions of the string. There must be one fewer than there
    ///   are normals.
    /// - `relax_rate`: How far each normal moves toward its transported value in one call, in `[0, 1]`.
    ///   `1` discards the previous frame entirely.
    pub fn update(&mut self, seed: Point3D, directions: &[Point3D], relax_rate: f64) {
        let (Some(&first_dir), Some(first)) = (directions.first(), self.normals.first_mut()) else {
            return;
        };
        *first = seed.reject(first_dir).try_normalize().unwrap_or(seed);

        for i in 1..self.normals.len().min(directions.len() + 1) {
            let prev_dir = directions[i - 1];
            let tangent = directions
                .get(i)
                .and_then(|&next| (prev_dir + next).try_normalize())
                .unwrap_or(prev_dir);

            let transported = self.normals[i - 1].reject(tangent);
            let blended = self.normals[i].lerp(transported, relax_rate);
            if let Some(n) = blended.try_normalize() {
                self.normals[i] = n;
            }
        }
    }

    /// The unit side vector (`tangent × normal`) at each point, for the width of a ribbon mesh.
    #[must_use]
    pub fn sides(&self, directions: &[Point3D]) -> Vec<Point3D> {
        self.normals
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let tangent = directions
                    .get(i)
                    .or_else(|| directions.last())
                    .copied()
                    .unwrap_or(Point3D::Z);
                tangent.cross(n).try_normalize().unwrap_or(Point3D::ZERO)
            })
            .collect()
    }
}
