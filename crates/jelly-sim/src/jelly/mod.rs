//! A jellyfish bell made of point masses and spring-dampers.

mod params;
mod point;

use core::ops::Range;

use aquamath::{Mat3, Point3D};
use rayon::prelude::*;

use crate::{Constraints, String3D, Terrain};

pub use params::{HardnessParam, JellyShape, TentacleParam};
pub use point::{JellyLink, JellyPoint, PointString};

/// The contracted rest length ratio of the outer ring links.
const OUTLINE_SHRINK: f64 = 0.5;

/// A jellyfish bell.
///
/// The points are stored as the top point, then the inner ring, the middle ring and the outer ring.
/// The middle and outer rings have the same number of points, and each middle point sits above an
/// outer point.
///
/// Tentacles are [`String3D`]s whose first point is a bell point. Those anchor points are moved by
/// the tentacle solve instead of by the bell integrator, so the weight of a tentacle drags on the bell
/// and the bell's spring forces pull the tentacle.
#[must_use]
#[derive(Debug, Clone)]
pub struct Jelly {
    /// The rest geometry.
    shape: JellyShape,
    /// All points of the bell.
    points: Vec<JellyPoint>,
    /// Passive links held at their rest length. The radial and outline links are kept only in their
    /// own sets, never here as well.
    links: Vec<JellyLink>,
    /// Spokes from the top point to the middle ring, contracted toward `radial_shrink`.
    shrink_radial_links: Vec<JellyLink>,
    /// The outer ring, contracted toward half its length.
    shrink_outline_links: Vec<JellyLink>,
    /// The attached tentacles.
    point_strings: Vec<PointString>,
    /// Whether each point anchors a tentacle.
    anchored: Vec<bool>,
    /// The forces applied to the tentacles.
    tentacle: TentacleParam,
}

impl Jelly {
    /// Builds a bell at rest with its top point at `(0, 0, top_height)`.
    ///
    /// # Errors
    ///
    /// - If either ring has fewer than three points.
    /// - If a radius or the radial shrink ratio is not positive.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(shape: JellyShape, hardness: &HardnessParam) -> Result<Self, String> {
        shape.validate()?;
        let (ni, no) = (shape.num_inner, shape.num_outer);

        let ring = |n: usize, r: f64, z: f64| {
            (0..n).map(move |i| {
                let (s, c) = (core::f64::consts::TAU * i as f64 / n as f64).sin_cos();
                JellyPoint::at(Point3D::new(r * c, r * s, z))
            })
        };
        let points = core::iter::once(JellyPoint::at(Point3D::new(0.0, 0.0, shape.top_height)))
            .chain(ring(ni, shape.inner_radius, shape.inner_height))
            .chain(ring(no, shape.middle_radius, shape.middle_height))
            .chain(ring(no, shape.outer_radius, shape.outer_height))
            .collect::<Vec<_>>();

        let inner = |i: usize| 1 + i % ni;
        let middle = |j: usize| 1 + ni + j % no;
        let outer = |j: usize| 1 + ni + no + j % no;
        let link = |a, b, k| JellyLink::between(&points, a, b, k);

        let mut links = Vec::with_capacity(2 * ni + 3 * no);
        for i in 0..ni {
            links.push(link(0, inner(i), hardness.top_inner));
            links.push(link(inner(i), inner(i + 1), hardness.inner_ring));
        }
        for j in 0..no {
            links.push(link(middle(j), middle(j + 1), hardness.middle_ring));
            links.push(link(middle(j), outer(j), hardness.middle_outer));
            // The inner point at the nearest angle, rounding halves up.
            let i = (2 * j * ni + no) / (2 * no);
            links.push(link(inner(i), middle(j), hardness.inner_middle));
        }
        let shrink_radial_links = (0..no).map(|j| link(0, middle(j), hardness.top_middle)).collect();
        let shrink_outline_links = (0..no)
            .map(|j| link(outer(j), outer(j + 1), hardness.outer_ring))
            .collect();

        ftlog::info!(
            "Created a jelly with {} points and {} links",
            points.len(),
            links.len() + 2 * no
        );

        Ok(Self {
            shape,
            anchored: vec![false; points.len()],
            points,
            links,
            shrink_radial_links,
            shrink_outline_links,
            point_strings: Vec::new(),
            tentacle: TentacleParam::default(),
        })
    }

    /// Sets the forces applied to the tentacles.
    pub const fn with_tentacle_param(mut self, tentacle: TentacleParam) -> Self {
        self.tentacle = tentacle;
        self
    }

    /// The rest geometry.
    #[must_use]
    pub const fn shape(&self) -> &JellyShape {
        &self.shape
    }

    /// The forces applied to the tentacles.
    #[must_use]
    pub const fn tentacle_param(&self) -> &TentacleParam {
        &self.tentacle
    }

    /// All points of the bell.
    #[must_use]
    pub fn points(&self) -> &[JellyPoint] {
        &self.points
    }

    /// All points of the bell, for a host that applies its own impulses.
    pub fn points_mut(&mut self) -> &mut [JellyPoint] {
        &mut self.points
    }

    /// The top point.
    #[must_use]
    pub fn top_point(&self) -> &JellyPoint {
        &self.points[0]
    }

    /// The indices of the inner ring in [`Jelly::points`].
    #[must_use]
    pub const fn inner_range(&self) -> Range<usize> {
        1..1 + self.shape.num_inner
    }

    /// The indices of the middle ring in [`Jelly::points`].
    #[must_use]
    pub const fn middle_range(&self) -> Range<usize> {
        let start = 1 + self.shape.num_inner;
        start..start + self.shape.num_outer
    }

    /// The indices of the outer ring in [`Jelly::points`].
    #[must_use]
    pub const fn outer_range(&self) -> Range<usize> {
        let start = 1 + self.shape.num_inner + self.shape.num_outer;
        start..start + self.shape.num_outer
    }

    /// The inner ring.
    #[must_use]
    pub fn inner_points(&self) -> &[JellyPoint] {
        &self.points[self.inner_range()]
    }

    /// The middle ring.
    #[must_use]
    pub fn middle_points(&self) -> &[JellyPoint] {
        &self.points[self.middle_range()]
    }

    /// The outer ring, where tentacles usually hang.
    #[must_use]
    pub fn outer_points(&self) -> &[JellyPoint] {
        &self.points[self.outer_range()]
    }

    /// Passive links held at their rest length. Disjoint from the radial and outline links.
    #[must_use]
    pub fn links(&self) -> &[JellyLink] {
        &self.links
    }

    /// Links from the top point to the middle ring, which contract with the muscle.
    #[must_use]
    pub fn shrink_radial_links(&self) -> &[JellyLink] {
        &self.shrink_radial_links
    }

    /// Links around the outer ring, which contract with the muscle.
    #[must_use]
    pub fn shrink_outline_links(&self) -> &[JellyLink] {
        &self.shrink_outline_links
    }

    /// The attached tentacles.
    #[must_use]
    pub fn point_strings(&self) -> &[PointString] {
        &self.point_strings
    }

    /// Attaches a string to bell point `point`.
    ///
    /// The string is re-laid hanging straight down from the point. Its first weight is the weight of
    /// the anchor during the tentacle solve, so it should be `1` to match the unit mass of the bell.
    ///
    /// # Errors
    ///
    /// - If `point` is out of range.
    /// - If `point` already anchors a string.
    pub fn attach_string(&mut self, point: usize, mut string: String3D) -> Result<(), String> {
        let anchor = self
            .points
            .get(point)
            .ok_or_else(|| format!("Point {point} is out of range for a jelly with {} points.", self.points.len()))?;
        if self.anchored[point] {
            return Err(format!("Point {point} already anchors a string."));
        }
        string.place(anchor.p, -Point3D::Z)?;
        self.anchored[point] = true;
        self.point_strings.push(PointString { point, string });
        Ok(())
    }

    /// Attaches a new tentacle of `num_segments` segments to every outer ring point.
    ///
    /// `weight` is the weight of every tentacle point but the anchor.
    ///
    /// # Errors
    ///
    /// See [`String3D::new`] and [`Jelly::attach_string`].
    pub fn attach_tentacles(&mut self, num_segments: usize, length: f64, weight: f64) -> Result<(), String> {
        for point in self.outer_range() {
            self.attach_string(point, String3D::new(num_segments, length, 1.0, weight)?)?;
        }
        ftlog::debug!("Attached {} tentacles of length {length}", self.shape.num_outer);
        Ok(())
    }

    /// Advances the bell and its tentacles by `dt`.
    ///
    /// `muscle` in `[0, 1]` blends the contracting links between their rest length (`0`) and their
    /// contracted length (`1`).
    ///
    /// A point that anchors a tentacle is not integrated with the bell. Its state and accumulated
    /// force are seated on the tentacle with [`String3D::seat_first`], the tentacle is solved free,
    /// and the solved first point is written back. The anchor is never pinned, so the tentacle's
    /// weight drags on the bell.
    pub fn update(&mut self, dt: f64, muscle: f64) {
        self.accumulate_forces(muscle);
        self.integrate_free_points(dt);
        let anchors = self.solve_tentacles(dt);
        self.write_back(&anchors);
        self.reset_forces();
    }

    /// Same as [`Jelly::update`], with the tentacles solved in parallel.
    pub fn par_update(&mut self, dt: f64, muscle: f64) {
        self.accumulate_forces(muscle);
        self.integrate_free_points(dt);
        let anchors = self.par_solve_tentacles(dt);
        self.write_back(&anchors);
        self.reset_forces();
    }

    /// Adds the forces of all three link sets.
    fn accumulate_forces(&mut self, muscle: f64) {
        for link in &self.links {
            link.apply(&mut self.points, 1.0, 0.0);
        }
        for link in &self.shrink_radial_links {
            link.apply(&mut self.points, self.shape.radial_shrink, muscle);
        }
        for link in &self.shrink_outline_links {
            link.apply(&mut self.points, OUTLINE_SHRINK, muscle);
        }
    }

    /// Integrates every point that does not anchor a tentacle.
    fn integrate_free_points(&mut self, dt: f64) {
        self.points
            .iter_mut()
            .zip(self.anchored.iter())
            .filter(|&(_, &anchored)| !anchored)
            .for_each(|(p, _)| p.integrate(dt));
    }

    /// Steps every tentacle with its anchor seated on the bell, returning the new anchor states.
    fn solve_tentacles(&mut self, dt: f64) -> Vec<(usize, Point3D, Point3D)> {
        let (points, param) = (&self.points, &self.tentacle);
        self.point_strings
            .iter_mut()
            .map(|ps| solve_tentacle(ps, points, param, dt))
            .collect()
    }

    /// Parallel version of [`Jelly::solve_tentacles`].
    fn par_solve_tentacles(&mut self, dt: f64) -> Vec<(usize, Point3D, Point3D)> {
        let (points, param) = (&self.points, &self.tentacle);
        self.point_strings
            .par_iter_mut()
            .map(|ps| solve_tentacle(ps, points, param, dt))
            .collect()
    }

    /// Copies the tentacle solve results onto the anchor points.
    fn write_back(&mut self, anchors: &[(usize, Point3D, Point3D)]) {
        for &(i, p, v) in anchors {
            self.points[i].p = p;
            self.points[i].v = v;
        }
    }

    fn reset_forces(&mut self) {
        for p in &mut self.points {
            p.f = Point3D::ZERO;
        }
    }

    /// Removes the velocity of every point, tentacles included, that moves into blocked terrain.
    ///
    /// Only the component along the terrain normal is removed, so points slide along walls.
    pub fn collide<T: Terrain + ?Sized>(&mut self, terrain: &T) {
        for point in &mut self.points {
            point.v = slide(terrain, point.p, point.v);
        }
        for ps in &mut self.point_strings {
            let positions = ps.string.points().to_vec();
            for (v, p) in ps.string.velocities_mut().iter_mut().zip(positions) {
                *v = slide(terrain, p, *v);
            }
        }
    }

    /// Adds `dv` to the velocity of every point, tentacles included.
    pub fn add_velocity(&mut self, dv: Point3D) {
        for point in &mut self.points {
            point.v += dv;
        }
        for ps in &mut self.point_strings {
            for v in ps.string.velocities_mut() {
                *v += dv;
            }
        }
    }

    /// The centroid of the bell points.
    #[expect(clippy::cast_precision_loss)]
    pub fn center(&self) -> Point3D {
        self.points.iter().map(|p| p.p).sum::<Point3D>() / self.points.len() as f64
    }

    /// The mean horizontal distance of the outer ring from the centroid.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn rim_radius(&self) -> f64 {
        let (cx, cy) = self.center().xy();
        let outer = self.outer_points();
        outer.iter().map(|p| (p.p.x - cx).hypot(p.p.y - cy)).sum::<f64>() / outer.len() as f64
    }

    /// The orientation of the bell: the third column is the axis from the middle ring to the top
    /// point, and the first column points as close as possible to the first middle point.
    #[expect(clippy::cast_precision_loss)]
    pub fn orientation(&self) -> Mat3 {
        let middle = self.middle_points();
        let ring_center = middle.iter().map(|p| p.p).sum::<Point3D>() / middle.len() as f64;
        let axis = (self.points[0].p - ring_center).try_normalize().unwrap_or(Point3D::Z);
        let side = (middle[0].p - ring_center).reject(axis);
        Mat3::look_along(axis, axis.cross(side))
    }

    /// The kinetic energy of the bell points, which have unit mass.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.points.iter().map(|p| 0.5 * p.v.length_sq()).sum()
    }

    /// Whether every bell and tentacle point has a finite position and velocity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.p.is_finite() && p.v.is_finite())
            && self.point_strings.iter().all(|ps| ps.string.is_finite())
    }
}

/// Seats a tentacle on its anchor, steps it and returns the anchor's new position and velocity.
fn solve_tentacle(
    ps: &mut PointString,
    points: &[JellyPoint],
    param: &TentacleParam,
    dt: f64,
) -> (usize, Point3D, Point3D) {
    let anchor = points[ps.point];
    let string = &mut ps.string;
    string.seat_first(anchor.p, anchor.v, anchor.f);
    string.add_hardness_force(param.hardness, param.decay);
    string.add_force(param.gravity, param.friction);
    let _ = string.update(dt, &Constraints::free());
    (ps.point, string.points()[0], string.velocities()[0])
}

/// The velocity `v` at `p` with any component into blocked terrain removed.
fn slide<T: Terrain + ?Sized>(terrain: &T, p: Point3D, v: Point3D) -> Point3D {
    if !terrain.hit_test(p.x, p.y) {
        return v;
    }
    match terrain.hit_normal(p.x, p.y) {
        Some(n) if v.dot(n) < 0.0 => v - n * v.dot(n),
        _ => v,
    }
}
