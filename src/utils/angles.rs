//! Angle helpers.

use std::f32::consts::{PI, TAU};

/// Normalizes an angle in radians into `(-π, π]`.
#[inline]
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_angle(0.0)).abs() < 1e-6);
        assert!((normalize_angle(TAU) - 0.0).abs() < 1e-6);
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-6);
    }
}
