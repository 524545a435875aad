//! Conformal transform of a doublet around its middle point.
//!
//! In the middle point's radial frame the map `(x, y) → (x, y) / (x² + y²)`
//! turns circles through the middle point into straight lines `v = A·u + B`.
//! Curvature and impact parameter of a triplet then follow from the line
//! through its bottom and top images.

use crate::spacepoint::SpacePoint;
use serde::Serialize;

/// Which side of the middle point a partner lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DoubletRole {
    /// Smaller radius than the middle point.
    Bottom,
    /// Larger radius than the middle point.
    Top,
}

impl DoubletRole {
    #[inline]
    fn cot_sign(self) -> f32 {
        match self {
            DoubletRole::Bottom => -1.0,
            DoubletRole::Top => 1.0,
        }
    }
}

/// Linearised doublet record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinCircle {
    /// z where the doublet line crosses r = 0.
    pub z_origin: f32,
    pub cot_theta: f32,
    /// Inverse transverse distance between the two points.
    pub i_delta_r: f32,
    /// Squared uncertainty of `cot_theta`.
    pub er: f32,
    pub u: f32,
    pub v: f32,
}

impl LinCircle {
    /// Transforms the pair (`middle`, `other`). The two points must differ in
    /// the transverse plane; the doublet search guarantees this.
    pub fn transform(middle: &SpacePoint, other: &SpacePoint, role: DoubletRole) -> Self {
        let (sin_phi, cos_phi) = (middle.y / middle.r, middle.x / middle.r);
        let dx = other.x - middle.x;
        let dy = other.y - middle.y;
        let dz = other.z - middle.z;

        let x = dx * cos_phi + dy * sin_phi;
        let y = dy * cos_phi - dx * sin_phi;
        let i_delta_r2 = 1.0 / (dx * dx + dy * dy);
        let i_delta_r = i_delta_r2.sqrt();

        let cot_theta = dz * i_delta_r * role.cot_sign();
        let z_origin = middle.z - middle.r * cot_theta;
        let er = ((middle.variance_z + other.variance_z)
            + cot_theta * cot_theta * (middle.variance_r + other.variance_r))
            * i_delta_r2;

        Self {
            z_origin,
            cot_theta,
            i_delta_r,
            er,
            u: x * i_delta_r2,
            v: y * i_delta_r2,
        }
    }
}
