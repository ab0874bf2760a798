//! Fixed four-decimal rounding shared by every rating-derived number
//!
//! Convergence is checked by exact equality, so every value that is stored
//! or compared must go through [`round4`].

/// Number of rounding steps per unit (four decimal places)
pub const ROUNDING_SCALE: f64 = 10_000.0;

/// Round to four decimal places, ties toward positive infinity.
///
/// `round4(0.00005) == 0.0001` and `round4(-0.00005) == 0.0`. NaN and
/// infinities pass through unchanged.
pub fn round4(value: f64) -> f64 {
    round_half_up(value * ROUNDING_SCALE) / ROUNDING_SCALE
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Whether a value is already on the four-decimal grid.
pub fn is_rounded(value: f64) -> bool {
    round4(value) == value
}
