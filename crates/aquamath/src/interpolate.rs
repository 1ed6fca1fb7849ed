//! Smoothstep and cubic Hermite basis functions.
//!
//! A cubic Hermite segment between values `p0`, `p1` with derivatives `m0`, `m1` is
//! `h00(t) p0 + h01(t) p1 + h10(t) m0 + h11(t) m1`. The value weights `h00` and `h01` are the
//! smoothstep blend, and the derivative weights carry the edge slopes.

/// The smoothstep polynomial `3t² - 2t³`.
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    t * t * 2.0f64.mul_add(-t, 3.0)
}

/// The four cubic Hermite basis weights `[h00, h01, h10, h11]` at `t`.
///
/// These are not clamped, so `t` outside `[0, 1]` extrapolates the cubic.
#[must_use]
pub fn hermite_weights(t: f64) -> [f64; 4] {
    let s = smoothstep(t);
    let u = 1.0 - t;
    [1.0 - s, s, t * u * u, t * t * (t - 1.0)]
}

/// Evaluates a cubic Hermite segment.
#[must_use]
pub fn hermite(p0: f64, p1: f64, m0: f64, m1: f64, t: f64) -> f64 {
    let [h00, h01, h10, h11] = hermite_weights(t);
    h00 * p0 + h01 * p1 + h10 * m0 + h11 * m1
}

/// Splits a continuous lattice coordinate into a cell index in `[0, cells - 1]` and the offset within
/// that cell.
///
/// Coordinates outside the lattice are assigned to the border cell, so the offset may fall outside
/// `[0, 1]`.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn cell_and_offset(coordinate: f64, cells: usize) -> (usize, f64) {
    let last = cells.saturating_sub(1);
    let cell = if coordinate <= 0.0 || coordinate.is_nan() {
        0
    } else {
        (coordinate.floor() as usize).min(last)
    };
    (cell, coordinate - cell as f64)
}
