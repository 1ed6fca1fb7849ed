//! A fish cruises at a constant speed.

use aquamath::Point3D;
use rand::Rng;

use super::{SwimBody, SwimParams, Swimmer};

/// Tail beats per unit of time at cruising speed.
const TAIL_FREQUENCY: f64 = 2.0;
/// Sideways swing of the tail.
const TAIL_AMPLITUDE: f64 = 0.1;

/// A fish.
#[must_use]
#[derive(Debug, Clone)]
pub struct Fish {
    body: SwimBody,
}

impl Fish {
    /// A fish at rest on `spawn`, facing `heading`.
    pub fn new(spawn: Point3D, heading: f64, params: SwimParams) -> Self {
        Self {
            body: SwimBody::new(spawn, heading, params),
        }
    }
}

impl Swimmer for Fish {
    fn body(&self) -> &SwimBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut SwimBody {
        &mut self.body
    }

    fn propel<R: Rng>(&mut self, _: f64, _: &mut R) -> f64 {
        self.body.params.speed
    }

    fn update_for_render(&mut self, dt: f64) {
        let params = &self.body.params;
        // Beat faster when swimming faster than cruising speed.
        let pace = if params.speed > 0.0 {
            self.body.velocity.length() / params.speed
        } else {
            1.0
        };
        self.body.rebuild_render(dt, TAIL_FREQUENCY * pace.max(0.5), TAIL_AMPLITUDE);
    }
}
