//! Internal unit system.
//!
//! Every length is in millimetres, every momentum in MeV and the magnetic
//! field in tesla. Configurations and hits authored in other units must be
//! converted once, explicitly, before they reach the seed finder.

use serde::{Deserialize, Serialize};

pub const UM: f32 = 1e-3;
pub const MM: f32 = 1.0;
pub const CM: f32 = 10.0;
pub const M: f32 = 1000.0;

pub const KEV: f32 = 1e-3;
pub const MEV: f32 = 1.0;
pub const GEV: f32 = 1000.0;

pub const GAUSS: f32 = 1e-4;
pub const KILOGAUSS: f32 = 0.1;
pub const TESLA: f32 = 1.0;

/// Transverse momentum per unit helix radius and field: pT[MeV] = 0.2998 · B[T] · R[mm].
pub const PT_PER_TESLA_MM: f32 = 0.299_792_46;

/// Multiplicative factors that take authored values into internal units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitScale {
    pub length: f32,
    pub momentum: f32,
    pub field: f32,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::INTERNAL
    }
}

impl UnitScale {
    /// Identity scale (values already in mm, MeV, T).
    pub const INTERNAL: UnitScale = UnitScale {
        length: MM,
        momentum: MEV,
        field: TESLA,
    };

    /// Values authored in metres, GeV and tesla.
    pub const METRE_GEV_TESLA: UnitScale = UnitScale {
        length: M,
        momentum: GEV,
        field: TESLA,
    };

    pub fn is_valid(&self) -> bool {
        [self.length, self.momentum, self.field]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Helix radius (mm) of a track with transverse momentum `pt` (MeV) in field `b_field` (T).
#[inline]
pub fn helix_radius(pt: f32, b_field: f32) -> f32 {
    pt / (PT_PER_TESLA_MM * b_field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_gev_track_in_two_tesla() {
        // 1 GeV in 2 T curls with R ≈ 1.668 m.
        let r = helix_radius(1.0 * GEV, 2.0 * TESLA);
        assert!((r - 1667.8).abs() < 1.0, "r={r}");
    }

    #[test]
    fn scale_validity() {
        assert!(UnitScale::INTERNAL.is_valid());
        assert!(UnitScale::METRE_GEV_TESLA.is_valid());
        let bad = UnitScale {
            length: 0.0,
            ..UnitScale::INTERNAL
        };
        assert!(!bad.is_valid());
    }
}
