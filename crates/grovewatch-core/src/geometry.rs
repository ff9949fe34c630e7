//! Vector helpers used by movement, targeting, and splash queries.
//!
//! Pure functions over [`Vector2`]; no state.

use crate::types::Vector2;

/// Squared distance, for range comparisons without a square root.
pub fn distance_sq(a: Vector2, b: Vector2) -> f64 {
    a.distance_squared(b)
}

/// Unit vector in the direction of `v`, or zero when `v` has no length.
pub fn normalize(v: Vector2) -> Vector2 {
    v.normalize_or_zero()
}

/// Clamp a scalar into `[min, max]`. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Move `from` toward `to` by at most `max_step`.
/// Returns the new point and whether `to` was reached.
pub fn move_towards(from: Vector2, to: Vector2, max_step: f64) -> (Vector2, bool) {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist <= f64::EPSILON {
        return (to, true);
    }
    (from + delta / dist * max_step, false)
}

/// Whether `point` lies within `radius` of `center` (inclusive).
pub fn within_radius(center: Vector2, point: Vector2, radius: f64) -> bool {
    radius >= 0.0 && distance_sq(center, point) <= radius * radius
}
