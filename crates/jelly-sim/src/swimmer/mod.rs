//! Steered agents that wander around their spawn point.

mod fish;
mod shrimp;

use aquamath::{CubicBezier, Mat3, Point3D};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use fish::Fish;
pub use shrimp::Shrimp;

/// The number of points in a render spine.
const SPINE_POINTS: usize = 8;
/// The number of samples used to measure the spine curve.
const SPINE_RESOLUTION: usize = 32;

/// Steering parameters shared by all swimmers.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwimParams {
    /// Cruising speed.
    pub speed: f64,
    /// How strongly the heading turns back toward the spawn point.
    pub leash: f64,
    /// The amplitude of the random turn acceleration.
    pub turn_noise: f64,
    /// The decay rate of the turn rate.
    pub turn_damping: f64,
    /// The rate at which the smoothed direction follows the heading.
    pub smoothing: f64,
    /// The decay rate of vertical velocity.
    pub vertical_damping: f64,
    /// The length of the body, for the render spine.
    pub body_length: f64,
}

impl Default for SwimParams {
    fn default() -> Self {
        Self {
            speed: 0.5,
            leash: 0.5,
            turn_noise: 4.0,
            turn_damping: 2.0,
            smoothing: 4.0,
            vertical_damping: 1.0,
            body_length: 0.3,
        }
    }
}

impl SwimParams {
    /// Sets the cruising speed.
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the strength of the pull back toward the spawn point.
    pub const fn with_leash(mut self, leash: f64) -> Self {
        self.leash = leash;
        self
    }

    /// Sets the amplitude of the random turn acceleration.
    pub const fn with_turn_noise(mut self, turn_noise: f64) -> Self {
        self.turn_noise = turn_noise;
        self
    }

    /// Sets the length of the body.
    pub const fn with_body_length(mut self, body_length: f64) -> Self {
        self.body_length = body_length;
        self
    }
}

/// The kinematic state shared by every kind of swimmer.
#[must_use]
#[derive(Debug, Clone)]
pub struct SwimBody {
    /// Position.
    pub position: Point3D,
    /// Velocity.
    pub velocity: Point3D,
    /// The point the swimmer is leashed to.
    pub spawn: Point3D,
    /// The heading angle in the horizontal plane.
    pub heading: f64,
    /// The turn rate of the heading.
    pub turn: f64,
    /// The low-pass filtered unit heading vector, which the swimmer actually moves along.
    pub dir: Point3D,
    /// The animation phase.
    pub phase: f64,
    /// Steering parameters.
    pub params: SwimParams,
    /// Points along the body from head to tail, rebuilt for rendering.
    spine: Vec<Point3D>,
    /// The render frame: the third column is the swimming direction.
    orientation: Mat3,
}

impl SwimBody {
    /// A body at rest on its spawn point, facing `heading`.
    pub fn new(spawn: Point3D, heading: f64, params: SwimParams) -> Self {
        let (s, c) = heading.sin_cos();
        Self {
            position: spawn,
            velocity: Point3D::ZERO,
            spawn,
            heading,
            turn: 0.0,
            dir: Point3D::new(c, s, 0.0),
            phase: 0.0,
            params,
            spine: Vec::new(),
            orientation: Mat3::IDENTITY,
        }
    }

    /// The render spine from head to tail, as of the last render update.
    #[must_use]
    pub fn spine(&self) -> &[Point3D] {
        &self.spine
    }

    /// The render frame, as of the last render update.
    pub const fn orientation(&self) -> Mat3 {
        self.orientation
    }

    /// Turns the heading and sets the velocity for a step of `dt` at `speed`.
    ///
    /// The turn rate is pushed toward the spawn point by the cross product of the smoothed direction
    /// and the offset to the spawn point, plus uniform noise, and decays over time. The smoothed
    /// direction then follows the heading at the smoothing rate.
    pub fn steer<R: Rng>(&mut self, dt: f64, speed: f64, rng: &mut R) {
        let p = &self.params;
        let to_spawn = self.spawn - self.position;
        let pull = self.dir.cross(Point3D::new(to_spawn.x, to_spawn.y, 0.0)).z;
        let noise: f64 = rng.random_range(-1.0..=1.0);

        self.turn += p.leash.mul_add(pull, p.turn_noise * noise) * dt;
        self.turn *= p.turn_damping.mul_add(-dt, 1.0).max(0.0);
        self.heading += self.turn * dt;

        let (s, c) = self.heading.sin_cos();
        let target = Point3D::new(c, s, 0.0);
        if let Some(dir) = self.dir.lerp(target, (p.smoothing * dt).min(1.0)).try_normalize() {
            self.dir = dir;
        }

        let vz = p.leash.mul_add((self.spawn.z - self.position.z) * dt, self.velocity.z);
        let vz = vz * p.vertical_damping.mul_add(-dt, 1.0).max(0.0);
        self.velocity = self.dir * speed + Point3D::Z * vz;
    }

    /// Turns to swim directly away from `from`.
    pub fn flee(&mut self, from: Point3D) {
        let away = self.position - from;
        if let Some(dir) = Point3D::new(away.x, away.y, 0.0).try_normalize() {
            self.heading = dir.y.atan2(dir.x);
            self.dir = dir;
            self.turn = 0.0;
        }
    }

    /// Sets the heading and smoothed direction from the horizontal velocity.
    fn sync_heading(&mut self) {
        if let Some(dir) = Point3D::new(self.velocity.x, self.velocity.y, 0.0).try_normalize() {
            self.heading = dir.y.atan2(dir.x);
            self.dir = dir;
        }
    }

    /// Advances the animation phase and rebuilds the spine and frame.
    ///
    /// The spine is a cubic bezier from the head back along the body, its control points swung to the
    /// side by `amplitude` with the phase, sampled at uniform arc length.
    pub fn rebuild_render(&mut self, dt: f64, frequency: f64, amplitude: f64) {
        self.phase = core::f64::consts::TAU.mul_add(frequency * dt, self.phase) % core::f64::consts::TAU;
        let forward = self.velocity.try_normalize().unwrap_or(self.dir);
        let side = Point3D::Z.cross(forward).try_normalize().unwrap_or(Point3D::Y);
        let length = self.params.body_length;

        let head = self.position;
        let wiggle = |offset: f64, scale: f64| side * (amplitude * scale * (self.phase + offset).sin());
        let curve = CubicBezier::new(
            head,
            head - forward * (length / 3.0) + wiggle(0.0, 0.3),
            head - forward * (2.0 * length / 3.0) + wiggle(1.0, 0.7),
            head - forward * length + wiggle(2.0, 1.0),
        );
        self.spine = curve.sample_uniform(SPINE_POINTS, SPINE_RESOLUTION);
        self.orientation = Mat3::look_along(forward, Point3D::Z);
    }
}

/// A steered agent.
///
/// Implementors provide their speed for each step and their animation, and share the steering and
/// boundary handling through [`SwimBody`].
pub trait Swimmer {
    /// The shared kinematic state.
    fn body(&self) -> &SwimBody;

    /// Mutable access to the shared kinematic state.
    fn body_mut(&mut self) -> &mut SwimBody;

    /// The speed for the next step.
    fn propel<R: Rng>(&mut self, dt: f64, rng: &mut R) -> f64;

    /// Advances the animation and rebuilds the render spine and frame.
    fn update_for_render(&mut self, dt: f64);

    /// The current position.
    fn position(&self) -> Point3D {
        self.body().position
    }

    /// Steers and sets the velocity for a step of `dt`, without moving.
    fn update_base<R: Rng>(&mut self, dt: f64, rng: &mut R) {
        let speed = self.propel(dt, rng);
        self.body_mut().steer(dt, speed, rng);
    }

    /// Steers and moves in the horizontal plane, unless `hit_test` reports the destination as blocked.
    ///
    /// Returns whether the swimmer moved.
    fn update_2d<R: Rng, F: Fn(f64, f64) -> bool>(&mut self, dt: f64, rng: &mut R, hit_test: F) -> bool {
        self.update_base(dt, rng);
        let body = self.body_mut();
        body.velocity.z = 0.0;
        let next = body.position + body.velocity * dt;
        if hit_test(next.x, next.y) {
            return false;
        }
        body.position = next;
        true
    }

    /// Steers and moves in 3D, inside a sphere of `radius` around the origin.
    ///
    /// A swimmer that ends up outside the sphere is put back on its surface, and if it was swimming
    /// outward the radial component of its velocity is reversed.
    fn update_3d<R: Rng>(&mut self, dt: f64, rng: &mut R, radius: f64) {
        self.update_base(dt, rng);
        let body = self.body_mut();
        body.position += body.velocity * dt;

        let distance = body.position.length();
        if distance > radius {
            let n = body.position / distance;
            let outward = body.velocity.dot(n);
            if outward > 0.0 {
                body.velocity -= n * (2.0 * outward);
            }
            body.position = n * radius;
            body.sync_heading();
        }
    }

    /// Turns to swim directly away from `from`.
    fn flee(&mut self, from: Point3D) {
        self.body_mut().flee(from);
    }
}
