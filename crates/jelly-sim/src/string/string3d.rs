//! A discretized inextensible rod.

use aquamath::{Point3D, solve_tridiagonal};

/// Optional constraints for a single [`String3D::update`] step.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constraints {
    /// A target position for `points[0]`. When present, the first point reaches it exactly at the end
    /// of the step.
    pub first: Option<Point3D>,
}

impl Constraints {
    /// No constraints: both ends are free.
    pub const fn free() -> Self {
        Self { first: None }
    }

    /// Pins `points[0]` to `target`.
    pub const fn pinned(target: Point3D) -> Self {
        Self { first: Some(target) }
    }
}

/// The result of a single [`String3D::update`] step.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutput {
    /// When the first point was pinned, the force that had to be applied to `points[0]` to move it to
    /// the target. The force exerted by the string on whatever holds the first point is its negation.
    pub first: Option<Point3D>,
}

/// A chain of `num_segments` segments of equal, fixed length.
///
/// The string is described by its points, `points[0]` being the first (free or pinned) end, and the
/// unit direction of each segment. Every point carries a velocity, a force accumulator and a weight.
/// The weight is an inverse mass: heavier points have smaller weights. Only the first point may have
/// a weight of zero, which makes it immovable by forces.
///
/// After every call to [`String3D::update`], consecutive points are exactly `segment_length` apart
/// (up to floating point rounding).
///
/// A typical step is:
///
/// ```
/// use jelly_sim::{Constraints, String3D};
///
/// let mut s = String3D::new(8, 2.0, 1.0, 1.0)?;
/// s.add_hardness_force(4.0, 0.5);
/// s.add_force(-9.8, 0.2);
/// let _ = s.update(0.01, &Constraints::free());
/// # Ok::<(), String>(())
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct String3D {
    /// The length of every segment.
    segment_length: f64,
    /// The unit direction of each segment, from `points[i]` to `points[i + 1]`.
    directions: Vec<Point3D>,
    /// The `num_segments + 1` points.
    points: Vec<Point3D>,
    /// The velocity of each point.
    velocities: Vec<Point3D>,
    /// The force accumulated on each point since the last update.
    forces: Vec<Point3D>,
    /// The inverse mass of each point.
    weights: Vec<f64>,
}

impl String3D {
    /// Creates a straight string hanging from the origin along `-z`.
    ///
    /// # Arguments
    ///
    /// - `num_segments`: The number of segments. Must be at least one.
    /// - `total_length`: The length of the whole string. Each segment is `total_length / num_segments`.
    /// - `start_weight`: The weight of `points[0]`.
    /// - `weight`: The weight of every other point.
    ///
    /// # Errors
    ///
    /// - If `num_segments` is zero.
    /// - If `total_length` is not a positive finite number.
    /// - If a weight is not finite.
    /// - If `start_weight` is negative or `weight` is not positive.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(num_segments: usize, total_length: f64, start_weight: f64, weight: f64) -> Result<Self, String> {
        if num_segments == 0 {
            return Err("A String3D needs at least one segment.".to_string());
        }
        if !(total_length.is_finite() && total_length > 0.0) {
            return Err(format!("String length must be positive and finite, got {total_length}."));
        }
        if !(start_weight.is_finite() && start_weight >= 0.0 && weight.is_finite() && weight > 0.0) {
            return Err(format!(
                "String weights must be finite, with a non-negative start weight and a positive weight, got {start_weight} and {weight}."
            ));
        }

        let segment_length = total_length / num_segments as f64;
        let points = (0..=num_segments)
            .map(|i| Point3D::new(0.0, 0.0, -segment_length * i as f64))
            .collect();
        let mut weights = vec![weight; num_segments + 1];
        weights[0] = start_weight;

        ftlog::debug!("Created a String3D with {num_segments} segments of length {segment_length}");

        Ok(Self {
            segment_length,
            directions: vec![-Point3D::Z; num_segments],
            points,
            velocities: vec![Point3D::ZERO; num_segments + 1],
            forces: vec![Point3D::ZERO; num_segments + 1],
            weights,
        })
    }

    /// Re-lays the string straight from `origin` along `direction`, at rest.
    ///
    /// # Errors
    ///
    /// - If `direction` has zero length.
    #[expect(clippy::cast_precision_loss)]
    pub fn place(&mut self, origin: Point3D, direction: Point3D) -> Result<(), String> {
        let dir = direction
            .try_normalize()
            .ok_or_else(|| format!("Cannot lay a string along {direction}."))?;
        for (i, p) in self.points.iter_mut().enumerate() {
            *p = origin + dir * (self.segment_length * i as f64);
        }
        self.directions.fill(dir);
        self.velocities.fill(Point3D::ZERO);
        self.forces.fill(Point3D::ZERO);
        Ok(())
    }

    /// The number of segments.
    #[must_use]
    pub const fn num_segments(&self) -> usize {
        self.directions.len()
    }

    /// The length of every segment.
    #[must_use]
    pub const fn segment_length(&self) -> f64 {
        self.segment_length
    }

    /// The points, `num_segments + 1` of them.
    #[must_use]
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// The velocity of each point.
    #[must_use]
    pub fn velocities(&self) -> &[Point3D] {
        &self.velocities
    }

    /// The velocities, for hosts that resolve collisions by writing velocities directly.
    #[must_use]
    pub fn velocities_mut(&mut self) -> &mut [Point3D] {
        &mut self.velocities
    }

    /// The unit direction of each segment.
    #[must_use]
    pub fn directions(&self) -> &[Point3D] {
        &self.directions
    }

    /// The forces accumulated since the last update.
    #[must_use]
    pub fn forces(&self) -> &[Point3D] {
        &self.forces
    }

    /// The weight (inverse mass) of each point.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The last point.
    pub fn end(&self) -> Point3D {
        self.points[self.points.len() - 1]
    }

    /// Adds a force to a single point.
    pub fn add_point_force(&mut self, i: usize, force: Point3D) {
        self.forces[i] += force;
    }

    /// Places `points[0]` on an external anchor with the given velocity, and adds the anchor's
    /// accumulated force to it.
    ///
    /// This is how a body shares one of its points with a string: after [`String3D::update`], the new
    /// position and velocity of `points[0]` are the anchor's.
    pub fn seat_first(&mut self, position: Point3D, velocity: Point3D, force: Point3D) {
        self.points[0] = position;
        self.velocities[0] = velocity;
        self.forces[0] += force;
    }

    /// Adds bending stiffness and bending damping forces at every interior joint.
    ///
    /// The discrete curvature at joint `j` is `d[j] - d[j - 1]` and its rate of change is built from
    /// the relative velocities of the neighboring points. The joint is pushed along
    /// `hardness * L / 2 * curvature + decay / 2 * rate` and each neighbor receives half of the
    /// opposite force, so the total force is zero.
    ///
    /// Call this before [`String3D::update`].
    pub fn add_hardness_force(&mut self, hardness: f64, decay: f64) {
        let n = self.num_segments();
        if n < 2 {
            return;
        }
        let l = self.segment_length;

        let rates = self
            .velocities
            .windows(2)
            .map(|w| (w[1] - w[0]) / l)
            .collect::<Vec<_>>();

        for j in 1..n {
            let curvature = self.directions[j] - self.directions[j - 1];
            let rate = rates[j] - rates[j - 1];
            let f = curvature * (hardness * l / 2.0) + rate * (decay / 2.0);
            self.forces[j] += f;
            self.forces[j - 1] -= f / 2.0;
            self.forces[j + 1] -= f / 2.0;
        }
    }

    /// Adds gravity along `z` and velocity-proportional drag to every movable point.
    ///
    /// Both are accelerations, so the force on a point is scaled by its mass (the inverse of its
    /// weight). Points with a weight of zero are skipped.
    pub fn add_force(&mut self, gravity_z: f64, friction: f64) {
        let gravity = Point3D::new(0.0, 0.0, gravity_z);
        for ((f, &v), &w) in self.forces.iter_mut().zip(self.velocities.iter()).zip(self.weights.iter()) {
            if w > 0.0 {
                *f += (gravity - v * friction) / w;
            }
        }
    }

    /// Advances the string by one step of length `dt`.
    ///
    /// The segment directions from the previous step are held fixed while solving for one scalar
    /// tension per segment, such that the velocity of every point relative to its neighbor along the
    /// shared segment is zero after the step. Each row of the system couples only the two adjacent
    /// tensions, so it is tridiagonal and solved in O(n).
    ///
    /// If `constraints.first` is set, the first row instead demands that `points[0]` reach the target
    /// in this step, and the force that this required is returned in [`StepOutput::first`].
    ///
    /// Velocities are then integrated from the forces and tensions, trial positions are integrated
    /// from the velocities, and finally each point is placed exactly `segment_length` after its
    /// predecessor, toward its trial position. The accumulated forces are reset.
    pub fn update(&mut self, dt: f64, constraints: &Constraints) -> StepOutput {
        let n = self.num_segments();
        let w = &self.weights;
        let d = &self.directions;

        let pinned_velocity = constraints.first.map(|target| (target - self.points[0]) / dt);

        // The velocity each point would have with no tension.
        let predicted = self
            .velocities
            .iter()
            .zip(self.forces.iter())
            .zip(w.iter())
            .map(|((&v, &f), &wi)| v + f * (dt * wi))
            .collect::<Vec<_>>();

        let mut lower = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut upper = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        for i in 0..n {
            let start = match (i, pinned_velocity) {
                (0, Some(v0)) => {
                    diag[i] = -w[1];
                    v0
                }
                _ => {
                    diag[i] = -(w[i] + w[i + 1]);
                    predicted[i]
                }
            };
            if i > 0 {
                lower[i] = w[i] * d[i - 1].dot(d[i]);
            }
            if i + 1 < n {
                upper[i] = w[i + 1] * d[i + 1].dot(d[i]);
            }
            rhs[i] = -(predicted[i + 1] - start).dot(d[i]) / dt;
        }
        // Folded segments can make the system singular.
        let tensions = solve_tridiagonal(&lower, &diag, &upper, &rhs).unwrap_or_else(|e| {
            ftlog::warn!("Skipping the tension solve: {e}");
            vec![0.0; n]
        });

        // A positive tension pulls the two ends of its segment together.
        let mut tension_forces = vec![Point3D::ZERO; n + 1];
        for (i, (&t, &di)) in tensions.iter().zip(d.iter()).enumerate() {
            tension_forces[i] += di * t;
            tension_forces[i + 1] -= di * t;
        }

        let mut output = StepOutput::default();
        for (i, v) in self.velocities.iter_mut().enumerate() {
            let next = *v + (self.forces[i] + tension_forces[i]) * (dt * w[i]);
            *v = if i == 0 { pinned_velocity.unwrap_or(next) } else { next };
        }
        if let Some(v0) = pinned_velocity {
            // Velocity is already updated, so recover the required acceleration from the prediction.
            let inertia = if w[0] > 0.0 { (v0 - predicted[0]) / (dt * w[0]) } else { Point3D::ZERO };
            output.first = Some(inertia - tension_forces[0]);
        }

        let trial = self
            .points
            .iter()
            .zip(self.velocities.iter())
            .map(|(&p, &v)| p + v * dt)
            .collect::<Vec<_>>();

        // Project the trial positions onto the chain of fixed-length segments.
        self.points[0] = constraints.first.unwrap_or(trial[0]);
        for i in 0..n {
            if let Some(dir) = (trial[i + 1] - self.points[i]).try_normalize() {
                self.directions[i] = dir;
            }
            self.points[i + 1] = self.points[i] + self.directions[i] * self.segment_length;
        }

        self.forces.fill(Point3D::ZERO);
        output
    }

    /// The kinetic energy of all movable points.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .zip(self.weights.iter())
            .filter(|&(_, &w)| w > 0.0)
            .map(|(v, w)| 0.5 * v.length_sq() / w)
            .sum()
    }

    /// The largest deviation of any segment from `segment_length`.
    #[must_use]
    pub fn max_length_error(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[0].distance(w[1]) - self.segment_length).abs())
            .fold(0.0, f64::max)
    }

    /// Whether all points and velocities are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points.iter().chain(self.velocities.iter()).all(|p| p.is_finite())
    }
}
