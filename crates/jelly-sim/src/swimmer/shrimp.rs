//! A shrimp drifts slowly and darts away in short bursts.

use aquamath::Point3D;
use rand::Rng;

use super::{SwimBody, SwimParams, Swimmer};

/// The fraction of the cruising speed kept between bursts.
const DRIFT: f64 = 0.2;
/// The extra speed of a burst, as a multiple of the cruising speed.
const BURST_SPEED: f64 = 3.0;
/// The decay rate of a burst.
const BURST_DECAY: f64 = 4.0;
/// The expected number of bursts per unit of time.
const BURST_RATE: f64 = 0.3;
/// Leg flutter per unit of time.
const LEG_FREQUENCY: f64 = 6.0;
/// Sideways swing of the body.
const LEG_AMPLITUDE: f64 = 0.03;

/// A shrimp.
#[must_use]
#[derive(Debug, Clone)]
pub struct Shrimp {
    body: SwimBody,
    /// The strength of the current burst, in `[0, 1]`.
    burst: f64,
}

impl Shrimp {
    /// A shrimp at rest on `spawn`, facing `heading`.
    pub fn new(spawn: Point3D, heading: f64, params: SwimParams) -> Self {
        Self {
            body: SwimBody::new(spawn, heading, params),
            burst: 0.0,
        }
    }

    /// The strength of the current burst, in `[0, 1]`.
    #[must_use]
    pub const fn burst(&self) -> f64 {
        self.burst
    }
}

impl Swimmer for Shrimp {
    fn body(&self) -> &SwimBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut SwimBody {
        &mut self.body
    }

    fn propel<R: Rng>(&mut self, dt: f64, rng: &mut R) -> f64 {
        if rng.random_bool((BURST_RATE * dt).clamp(0.0, 1.0)) {
            self.burst = 1.0;
        }
        self.burst *= BURST_DECAY.mul_add(-dt, 1.0).max(0.0);
        self.body.params.speed * BURST_SPEED.mul_add(self.burst, DRIFT)
    }

    fn update_for_render(&mut self, dt: f64) {
        self.body.rebuild_render(dt, LEG_FREQUENCY, LEG_AMPLITUDE * (1.0 - self.burst));
    }

    fn flee(&mut self, from: Point3D) {
        self.body.flee(from);
        self.burst = 1.0;
    }
}
