//! A jellyfish bell as a deformable lattice, used to bend a mesh in a vertex shader.

mod coord;

use aquamath::{Point3D, interpolate};
use rayon::prelude::*;

pub use coord::JellyCoord;

/// The integration step of [`JellyGrid::update`], independent of the frame time.
pub const GRID_TIME_STEP: f64 = 0.01;

/// The polar angle of the bell rim, in radians, for a local radius of `1`.
const BELL_ANGLE: f64 = 1.2;
/// How much of the bell angle the pulse contracts at its peak.
const PULSE_DEPTH: f64 = 0.2;
/// The radial wave number of the pulse, so that the rim contracts after the top.
const PULSE_WAVE: f64 = 2.0;
/// The angular modulation of the pulse phase.
const PULSE_TWIST: f64 = 0.3;
/// How much thinner the outer layer is than the inner one.
const SHELL_THICKNESS: f64 = 0.25;

/// The stiffness of the springs between lattice neighbors.
const INNER_FORCE: f64 = 4.0;
/// The stiffness of the spring toward the destination.
const DESTINATION_STIFFNESS: f64 = 8.0;
/// The damping of the spring toward the destination.
const DESTINATION_DAMPING: f64 = 2.0;

/// The swimming bell shape that the lattice node with local polar coordinates `(r, th)` on layer `z`
/// is pulled toward at `time`.
///
/// The local disc is wrapped onto a dome around `+z`: the local radius becomes a polar angle, scaled
/// down by a pulse that travels from the top to the rim once per unit of time. Layer `0` is the
/// inner surface of radius `1` and layer `1` the outer surface.
#[must_use]
pub fn jelly_destination(r: f64, th: f64, time: f64, z: f64) -> Point3D {
    let phase = core::f64::consts::TAU.mul_add(time, -PULSE_WAVE * r) + PULSE_TWIST * th.sin();
    let contraction = 0.5f64.mul_add(phase.sin(), 0.5);
    let rlen = r * PULSE_DEPTH.mul_add(-contraction, 1.0);
    let a = rlen * BELL_ANGLE;
    let radius = SHELL_THICKNESS.mul_add(-z, 1.0);
    let (sa, ca) = a.sin_cos();
    let (st, ct) = th.sin_cos();
    Point3D::new(radius * sa * ct, radius * sa * st, radius * ca)
}

/// A two-layer `(segments + 1)²` lattice pulled toward [`jelly_destination`].
///
/// Node `(i, j)` of layer `k` has local coordinates `x = 2i / segments - 1`, `y = 2j / segments - 1`
/// and `z = k`. Local points inside the box `[-1, 1]² × [0, 1]` are mapped onto the deformed lattice
/// by [`JellyGrid::transform_grid_point`].
#[must_use]
#[derive(Debug, Clone)]
pub struct JellyGrid {
    /// The number of cells along each side.
    segments: usize,
    /// The nodes, layer by layer, each layer row by row.
    coords: Vec<JellyCoord>,
    /// Pairs of nodes joined by an inner spring.
    neighbors: Vec<(usize, usize)>,
    /// The time of the last update.
    time: f64,
}

impl JellyGrid {
    /// Creates a lattice with `segments` cells per side, resting on its shape at time `0`.
    ///
    /// # Errors
    ///
    /// - If `segments` is zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(segments: usize) -> Result<Self, String> {
        if segments == 0 {
            return Err("A JellyGrid needs at least one segment per side.".to_string());
        }
        let side = segments + 1;
        let local = |i: usize| 2.0 * i as f64 / segments as f64 - 1.0;

        let coords = (0..2)
            .flat_map(|k| (0..side).flat_map(move |j| (0..side).map(move |i| (i, j, k))))
            .map(|(i, j, k)| JellyCoord::new(local(i), local(j), k as f64))
            .collect::<Vec<_>>();

        let index = |i: usize, j: usize, k: usize| (k * side + j) * side + i;
        let mut neighbors = Vec::new();
        for k in 0..2 {
            for j in 0..side {
                for i in 0..side {
                    if i + 1 < side {
                        neighbors.push((index(i, j, k), index(i + 1, j, k)));
                    }
                    if j + 1 < side {
                        neighbors.push((index(i, j, k), index(i, j + 1, k)));
                    }
                    if k == 0 {
                        neighbors.push((index(i, j, 0), index(i, j, 1)));
                    }
                }
            }
        }

        ftlog::info!("Created a JellyGrid with {} nodes and {} springs", coords.len(), neighbors.len());

        Ok(Self {
            segments,
            coords,
            neighbors,
            time: 0.0,
        })
    }

    /// The number of cells along each side.
    #[must_use]
    pub const fn segments(&self) -> usize {
        self.segments
    }

    /// The time passed to the last update.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// All nodes, layer by layer, each layer row by row.
    #[must_use]
    pub fn coords(&self) -> &[JellyCoord] {
        &self.coords
    }

    /// The node at column `i`, row `j` of layer `k`.
    #[must_use]
    pub fn coord(&self, i: usize, j: usize, k: usize) -> &JellyCoord {
        &self.coords[self.index(i, j, k)]
    }

    /// Mutable access to the node at column `i`, row `j` of layer `k`.
    pub fn coord_mut(&mut self, i: usize, j: usize, k: usize) -> &mut JellyCoord {
        let index = self.index(i, j, k);
        &mut self.coords[index]
    }

    const fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let side = self.segments + 1;
        (k * side + j) * side + i
    }

    /// Pulls every node toward its destination at `time` and takes one step.
    ///
    /// `time` only selects the target shape. The integration step is always [`GRID_TIME_STEP`], so
    /// the simulation advances by the same amount per call however far apart the times are.
    pub fn update(&mut self, time: f64) {
        self.time = time;
        for c in &mut self.coords {
            c.dst = jelly_destination(c.r, c.th, time, c.z);
        }

        for &(a, b) in &self.neighbors {
            let (ca, cb) = (&self.coords[a], &self.coords[b]);
            let delta = cb.p - ca.p;
            let actual = delta.length();
            if actual > 0.0 {
                let target = ca.dst.distance(cb.dst);
                let f = delta * (INNER_FORCE * (1.0 - target / actual));
                self.coords[a].f += f;
                self.coords[b].f -= f;
            }
        }

        for c in &mut self.coords {
            c.f += (c.dst - c.p) * DESTINATION_STIFFNESS - c.v * DESTINATION_DAMPING;
            c.v += c.f * GRID_TIME_STEP;
            c.p += c.v * GRID_TIME_STEP;
            c.f = Point3D::ZERO;
        }
    }

    /// Maps a local point in `[-1, 1]² × [0, 1]` onto the deformed lattice.
    ///
    /// Within each layer the lattice is blended with a bicubic Hermite patch: smoothstep weights on
    /// the corner positions plus slope weights on the lattice derivatives along `x` and `y`. The
    /// derivatives are central differences inside the lattice and one-sided at its borders. The two
    /// layers are then blended linearly in `z`. Lattice nodes map exactly onto their positions, and a
    /// lattice whose positions are an affine function of the local coordinates is reproduced exactly.
    ///
    /// Points outside the box extrapolate from the border cells.
    #[expect(clippy::cast_precision_loss)]
    pub fn transform_grid_point(&self, local: Point3D) -> Point3D {
        let n = self.segments as f64;
        let (ci, tx) = interpolate::cell_and_offset((local.x + 1.0) * 0.5 * n, self.segments);
        let (cj, ty) = interpolate::cell_and_offset((local.y + 1.0) * 0.5 * n, self.segments);
        let [x0, x1, dx0, dx1] = interpolate::hermite_weights(tx);
        let [y0, y1, dy0, dy1] = interpolate::hermite_weights(ty);
        let xs = [(ci, x0, dx0), (ci + 1, x1, dx1)];
        let ys = [(cj, y0, dy0), (cj + 1, y1, dy1)];

        let layer = |k: usize| {
            let mut sum = Point3D::ZERO;
            for &(i, wx, sx) in &xs {
                for &(j, wy, sy) in &ys {
                    sum += self.coord(i, j, k).p * (wx * wy)
                        + self.slope_x(i, j, k) * (sx * wy)
                        + self.slope_y(i, j, k) * (wx * sy);
                }
            }
            sum
        };
        layer(0).lerp(layer(1), local.z)
    }

    /// [`JellyGrid::transform_grid_point`] for many points, in parallel.
    #[must_use]
    pub fn par_transform_grid_points(&self, locals: &[Point3D]) -> Vec<Point3D> {
        locals.par_iter().map(|&p| self.transform_grid_point(p)).collect()
    }

    /// The derivative of the lattice positions along `i`, per cell.
    #[expect(clippy::cast_precision_loss)]
    fn slope_x(&self, i: usize, j: usize, k: usize) -> Point3D {
        let (lo, hi) = (i.saturating_sub(1), (i + 1).min(self.segments));
        (self.coord(hi, j, k).p - self.coord(lo, j, k).p) / (hi - lo) as f64
    }

    /// The derivative of the lattice positions along `j`, per cell.
    #[expect(clippy::cast_precision_loss)]
    fn slope_y(&self, i: usize, j: usize, k: usize) -> Point3D {
        let (lo, hi) = (j.saturating_sub(1), (j + 1).min(self.segments));
        (self.coord(i, hi, k).p - self.coord(i, lo, k).p) / (hi - lo) as f64
    }

    /// Whether every node has a finite position and velocity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.p.is_finite() && c.v.is_finite())
    }
}
