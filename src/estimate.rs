//! Rough track parameters from the three positions of a seed.
//!
//! The transverse circle through bottom, middle and top gives curvature,
//! impact parameter and azimuth; the polar angle comes from the z rise along
//! the arc from bottom to top. The result is a starting point for a fit, not a
//! fit.

use crate::units::PT_PER_TESLA_MM;
use nalgebra::{Vector2, Vector3};
use serde::Serialize;

/// Perigee-like parameters of a seed (mm, rad, MeV).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackParamsEstimate {
    /// Signed transverse distance of closest approach to the beam axis;
    /// positive when the axis lies to the left of the direction of motion.
    pub d0: f32,
    /// Signed 1/R, positive for counter-clockwise motion seen from +z.
    pub curvature: f32,
    /// Azimuth of the direction of motion at the bottom point.
    pub phi: f32,
    /// Polar angle in `[0, π]`.
    pub theta: f32,
    /// Transverse momentum; infinite for a straight track.
    pub pt: f32,
}

/// Estimates track parameters in the beam-centred frame.
///
/// Returns `None` when two points coincide in the transverse plane or the
/// field is not positive.
pub fn estimate_track_params(
    bottom: &Vector3<f32>,
    middle: &Vector3<f32>,
    top: &Vector3<f32>,
    b_field: f32,
) -> Option<TrackParamsEstimate> {
    if !(b_field > 0.0) {
        return None;
    }
    let p1 = bottom.xy();
    let p2 = middle.xy();
    let p3 = top.xy();
    let a = p2 - p1;
    let b = p3 - p1;
    if a.norm_squared() == 0.0 || b.norm_squared() == 0.0 || (p3 - p2).norm_squared() == 0.0 {
        return None;
    }

    let cross = a.perp(&b);
    let scale = a.norm() * b.norm();
    let straight = cross.abs() <= scale * 1e-6;

    let (d0, curvature, phi, arc) = if straight {
        let dir = b.normalize();
        // Closest point of the line to the origin.
        let pca = p1 - dir * p1.dot(&dir);
        (pca.perp(&dir), 0.0, dir.y.atan2(dir.x), b.norm())
    } else {
        let d = 2.0 * cross;
        let a2 = a.norm_squared();
        let b2 = b.norm_squared();
        let center = p1 + Vector2::new(b.y * a2 - a.y * b2, a.x * b2 - b.x * a2) / d;
        let radius = (p1 - center).norm();
        let ccw = cross > 0.0;
        let tangent = |p: Vector2<f32>| {
            let rel = p - center;
            let t = if ccw {
                Vector2::new(-rel.y, rel.x)
            } else {
                Vector2::new(rel.y, -rel.x)
            };
            t / radius
        };

        let dist = center.norm();
        let pca = if dist > 0.0 {
            center - center * (radius / dist)
        } else {
            p1
        };
        let d0 = pca.perp(&tangent(pca));
        let dir = tangent(p1);
        let chord = b.norm();
        let arc = 2.0 * radius * (chord / (2.0 * radius)).min(1.0).asin();
        let signed = if ccw { 1.0 / radius } else { -1.0 / radius };
        (d0, signed, dir.y.atan2(dir.x), arc)
    };

    let theta = arc.atan2(top.z - bottom.z);
    let pt = if curvature == 0.0 {
        f32::INFINITY
    } else {
        PT_PER_TESLA_MM * b_field / curvature.abs()
    };
    Some(TrackParamsEstimate {
        d0,
        curvature,
        phi,
        theta,
        pt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn on_circle(radius: f32, r: f32, z: f32) -> Vector3<f32> {
        let alpha = (r / (2.0 * radius)).asin();
        Vector3::new(r * alpha.cos(), r * alpha.sin(), z)
    }

    #[test]
    fn straight_radial_track() {
        let est = estimate_track_params(
            &Vector3::new(10.0, 0.0, 10.0),
            &Vector3::new(50.0, 0.0, 50.0),
            &Vector3::new(100.0, 0.0, 100.0),
            2.0,
        )
        .expect("estimate");
        assert_eq!(est.curvature, 0.0);
        assert!(est.pt.is_infinite());
        assert!(est.d0.abs() < 1e-4);
        assert!(est.phi.abs() < 1e-6);
        assert!((est.theta - FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn helix_from_origin_recovers_pt() {
        let pt = 1000.0;
        let radius = pt / (PT_PER_TESLA_MM * 2.0);
        let b = on_circle(radius, 30.0, 5.0);
        let m = on_circle(radius, 80.0, 15.0);
        let t = on_circle(radius, 140.0, 25.0);
        let est = estimate_track_params(&b, &m, &t, 2.0).expect("estimate");
        assert!(est.curvature > 0.0);
        assert!((est.pt - pt).abs() / pt < 0.01, "pt {}", est.pt);
        assert!(est.d0.abs() < 0.5, "d0 {}", est.d0);
        let expected_phi = 2.0 * (30.0 / (2.0 * radius)).asin();
        assert!((est.phi - expected_phi).abs() < 1e-3);
        assert!(est.theta > 0.0 && est.theta < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn mirrored_helix_flips_curvature_sign() {
        let radius = 500.0;
        let flip = |v: Vector3<f32>| Vector3::new(v.x, -v.y, v.z);
        let b = flip(on_circle(radius, 30.0, 0.0));
        let m = flip(on_circle(radius, 80.0, 0.0));
        let t = flip(on_circle(radius, 140.0, 0.0));
        let est = estimate_track_params(&b, &m, &t, 2.0).expect("estimate");
        assert!(est.curvature < 0.0);
        assert!((est.curvature.abs() - 1.0 / radius).abs() < 1e-5);
    }

    #[test]
    fn displaced_straight_track_has_impact() {
        let est = estimate_track_params(
            &Vector3::new(30.0, 15.0, 0.0),
            &Vector3::new(80.0, 15.0, 0.0),
            &Vector3::new(140.0, 15.0, 0.0),
            2.0,
        )
        .expect("estimate");
        assert!((est.d0.abs() - 15.0).abs() < 1e-3);
        assert!((est.theta - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let p = Vector3::new(10.0, 0.0, 0.0);
        assert!(estimate_track_params(&p, &p, &Vector3::new(20.0, 0.0, 0.0), 2.0).is_none());
        assert!(estimate_track_params(
            &Vector3::new(10.0, 0.0, 0.0),
            &Vector3::new(20.0, 0.0, 0.0),
            &Vector3::new(30.0, 0.0, 0.0),
            0.0
        )
        .is_none());
    }
}
