//! Box-Muller sampling into a bounded range.
use std::f64::consts::PI;

use rand::{Rng, RngCore};

use crate::model::RangeHint;

/// Fallback bounds are drawn from the uniform number range.
const FALLBACK_SPAN: std::ops::Range<f64> = 0.0..1000.0;

/// Standard normal sample from two uniform draws in `(0, 1)`.
pub fn box_muller_z0(u1: f64, u2: f64) -> f64 {
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Places `z0` on `[min, max]` with ±3σ spanning the range, clamped.
/// Requires finite `min <= max`.
pub fn map_into_range(z0: f64, min: f64, max: f64) -> f64 {
    // halves first so huge bounds cannot overflow
    let mean = min / 2.0 + max / 2.0;
    let std_dev = max / 6.0 - min / 6.0;
    (mean + z0 * std_dev).clamp(min, max)
}

/// Turns a possibly partial hint into a usable `(min, max)`. Missing and
/// non-finite bounds are drawn fresh; inverted bounds are swapped.
pub fn resolve_bounds(hint: Option<&RangeHint>, rng: &mut dyn RngCore) -> (f64, f64) {
    let finite = |b: Option<f64>| b.filter(|x| x.is_finite());
    let (min, max) = match hint {
        Some(h) => (finite(h.min), finite(h.max)),
        None => (None, None),
    };
    let min = min.unwrap_or_else(|| rng.gen_range(FALLBACK_SPAN));
    let max = max.unwrap_or_else(|| rng.gen_range(FALLBACK_SPAN));
    if min > max { (max, min) } else { (min, max) }
}

/// One normally distributed number within the hinted range. Both uniform
/// draws happen back-to-back on the exclusively borrowed stream.
pub fn sample(hint: Option<&RangeHint>, rng: &mut dyn RngCore) -> f64 {
    let (min, max) = resolve_bounds(hint, rng);
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let value = map_into_range(box_muller_z0(u1, u2), min, max);
    tracing::trace!(min, max, u1, u2, value, "box-muller sample");
    value
}

// ------------------------------- Tests ------------------------------------ //
