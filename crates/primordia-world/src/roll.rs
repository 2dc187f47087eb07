//! Small random helpers shared by generation and behaviour code.
//!
//! These never panic on degenerate parameters: a zero span yields the lower
//! bound and probabilities outside `[0, 1]` saturate.

use rand::Rng;

/// `true` with probability `p`.
pub fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Uniform value in `[low, low + span)`.
pub fn uniform(rng: &mut impl Rng, low: f64, span: f64) -> f64 {
    rng.random::<f64>().mul_add(span, low)
}

/// Uniform value in `[-half, half)`.
pub fn centered(rng: &mut impl Rng, half: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * 2.0 * half
}

/// Pick one element uniformly. Returns `None` for an empty slice.
pub fn pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}
