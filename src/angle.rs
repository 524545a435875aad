//! Azimuth helpers.

use std::f32::consts::{PI, TAU};

/// Wraps an azimuth into [-π, π).
#[inline]
pub fn wrap_phi(phi: f32) -> f32 {
    let wrapped = (phi + PI).rem_euclid(TAU) - PI;
    if wrapped >= PI {
        -PI
    } else {
        wrapped
    }
}

/// True when `[min, max]` covers the full circle (within float noise).
#[inline]
pub fn covers_full_circle(min: f32, max: f32) -> bool {
    (max - min) >= TAU - 1e-5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn wrap_phi_basic() {
        assert!(approx_eq(wrap_phi(0.5), 0.5));
        assert!(approx_eq(wrap_phi(PI + 0.25), -PI + 0.25));
        assert!(approx_eq(wrap_phi(-PI - 0.25), PI - 0.25));
        assert!(approx_eq(wrap_phi(3.0 * TAU + 0.1), 0.1));
    }

    #[test]
    fn full_circle_detection() {
        assert!(covers_full_circle(-PI, PI));
        assert!(!covers_full_circle(-1.0, 1.0));
    }
}
