//! Configuration for building a `Jelly`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The stiffness of each class of link in a jelly bell.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HardnessParam {
    /// Top point to each inner ring point.
    pub top_inner: f64,
    /// Between neighbors on the inner ring.
    pub inner_ring: f64,
    /// Top point to each middle ring point. These links contract with the muscle.
    pub top_middle: f64,
    /// Between neighbors on the middle ring.
    pub middle_ring: f64,
    /// Middle ring point to the outer ring point below it.
    pub middle_outer: f64,
    /// Between neighbors on the outer ring. These links contract with the muscle.
    pub outer_ring: f64,
    /// Inner ring point to the nearest middle ring points.
    pub inner_middle: f64,
}

impl Default for HardnessParam {
    fn default() -> Self {
        Self {
            top_inner: 20.0,
            inner_ring: 20.0,
            top_middle: 10.0,
            middle_ring: 20.0,
            middle_outer: 20.0,
            outer_ring: 10.0,
            inner_middle: 20.0,
        }
    }
}

impl HardnessParam {
    /// The same stiffness for every class of link.
    pub const fn uniform(k: f64) -> Self {
        Self {
            top_inner: k,
            inner_ring: k,
            top_middle: k,
            middle_ring: k,
            middle_outer: k,
            outer_ring: k,
            inner_middle: k,
        }
    }

    /// Multiplies every stiffness by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            top_inner: self.top_inner * factor,
            inner_ring: self.inner_ring * factor,
            top_middle: self.top_middle * factor,
            middle_ring: self.middle_ring * factor,
            middle_outer: self.middle_outer * factor,
            outer_ring: self.outer_ring * factor,
            inner_middle: self.inner_middle * factor,
        }
    }
}

/// The rest geometry of a jelly bell.
///
/// The bell is a dome around the `z` axis, opening downward: a top point, then the inner, middle and
/// outer rings at decreasing heights.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JellyShape {
    /// The number of points on the inner ring.
    pub num_inner: usize,
    /// The number of points on each of the middle and outer rings.
    pub num_outer: usize,
    /// The height of the top point.
    pub top_height: f64,
    /// The radius of the inner ring.
    pub inner_radius: f64,
    /// The height of the inner ring.
    pub inner_height: f64,
    /// The radius of the middle ring.
    pub middle_radius: f64,
    /// The height of the middle ring.
    pub middle_height: f64,
    /// The radius of the outer ring.
    pub outer_radius: f64,
    /// The height of the outer ring.
    pub outer_height: f64,
    /// The rest length ratio of the radial links when the muscle is fully contracted.
    pub radial_shrink: f64,
}

impl Default for JellyShape {
    fn default() -> Self {
        Self {
            num_inner: 6,
            num_outer: 12,
            top_height: 1.0,
            inner_radius: 0.5,
            inner_height: 0.8,
            middle_radius: 0.9,
            middle_height: 0.4,
            outer_radius: 1.0,
            outer_height: 0.0,
            radial_shrink: 0.8,
        }
    }
}

impl JellyShape {
    /// Sets the number of points on the rings.
    pub const fn with_rings(mut self, num_inner: usize, num_outer: usize) -> Self {
        self.num_inner = num_inner;
        self.num_outer = num_outer;
        self
    }

    /// Sets the contracted rest length ratio of the radial links.
    pub const fn with_radial_shrink(mut self, radial_shrink: f64) -> Self {
        self.radial_shrink = radial_shrink;
        self
    }

    /// Scales every radius and height by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        for v in [
            &mut self.top_height,
            &mut self.inner_radius,
            &mut self.inner_height,
            &mut self.middle_radius,
            &mut self.middle_height,
            &mut self.outer_radius,
            &mut self.outer_height,
        ] {
            *v *= factor;
        }
        self
    }

    /// Checks that the shape can be built.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.num_inner < 3 || self.num_outer < 3 {
            return Err(format!(
                "A jelly needs at least 3 points per ring, got {} inner and {} outer.",
                self.num_inner, self.num_outer
            ));
        }
        let radii = [self.inner_radius, self.middle_radius, self.outer_radius];
        if radii.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(format!("Jelly ring radii must be positive and finite, got {radii:?}."));
        }
        if !(self.radial_shrink.is_finite() && self.radial_shrink > 0.0) {
            return Err(format!("Radial shrink must be positive, got {}.", self.radial_shrink));
        }
        Ok(())
    }
}

/// The forces applied to tentacles attached to a jelly.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TentacleParam {
    /// Bending stiffness, see `String3D::add_hardness_force`.
    pub hardness: f64,
    /// Bending damping, see `String3D::add_hardness_force`.
    pub decay: f64,
    /// Gravity along `z`.
    pub gravity: f64,
    /// Velocity drag.
    pub friction: f64,
}

impl Default for TentacleParam {
    fn default() -> Self {
        Self {
            hardness: 2.0,
            decay: 0.2,
            gravity: -1.0,
            friction: 0.5,
        }
    }
}
