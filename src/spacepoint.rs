//! Space point input and the internal, normalised representation.
//!
//! Callers hand in any hit type implementing [`SpacePointLike`]. The grid
//! converts each hit exactly once into a [`SpacePoint`]: the beam offset is
//! removed, radius and azimuth are cached and the variance model is applied.
//! The caller's slice index travels with the point as its [`SpacePointId`].

use crate::units::UnitScale;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Back-reference to the caller's hit (its index in the input slice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpacePointId(pub u32);

impl SpacePointId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read access to an external hit record.
pub trait SpacePointLike {
    fn x(&self) -> f32;
    fn y(&self) -> f32;
    fn z(&self) -> f32;
    /// Radial position variance (mm²).
    fn variance_r(&self) -> f32 {
        0.0
    }
    /// Longitudinal position variance (mm²).
    fn variance_z(&self) -> f32 {
        0.0
    }
}

/// Plain hit record used by the tools and the JSON/text readers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpacePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub variance_r: f32,
    #[serde(default)]
    pub variance_z: f32,
    /// Detector layer tag, only carried for printing.
    #[serde(default)]
    pub layer: u32,
}

impl RawSpacePoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    pub fn with_variance(mut self, variance_r: f32, variance_z: f32) -> Self {
        self.variance_r = variance_r;
        self.variance_z = variance_z;
        self
    }

    /// Converts a hit authored in external units. Variances scale with length².
    pub fn scaled(&self, scale: &UnitScale) -> Self {
        let l2 = scale.length * scale.length;
        Self {
            x: self.x * scale.length,
            y: self.y * scale.length,
            z: self.z * scale.length,
            variance_r: self.variance_r * l2,
            variance_z: self.variance_z * l2,
            layer: self.layer,
        }
    }

    pub fn radius(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl SpacePointLike for RawSpacePoint {
    #[inline]
    fn x(&self) -> f32 {
        self.x
    }
    #[inline]
    fn y(&self) -> f32 {
        self.y
    }
    #[inline]
    fn z(&self) -> f32 {
        self.z
    }
    #[inline]
    fn variance_r(&self) -> f32 {
        self.variance_r
    }
    #[inline]
    fn variance_z(&self) -> f32 {
        self.variance_z
    }
}

impl SpacePointLike for [f32; 3] {
    #[inline]
    fn x(&self) -> f32 {
        self[0]
    }
    #[inline]
    fn y(&self) -> f32 {
        self[1]
    }
    #[inline]
    fn z(&self) -> f32 {
        self[2]
    }
}

impl SpacePointLike for (f32, f32, f32) {
    #[inline]
    fn x(&self) -> f32 {
        self.0
    }
    #[inline]
    fn y(&self) -> f32 {
        self.1
    }
    #[inline]
    fn z(&self) -> f32 {
        self.2
    }
}

impl SpacePointLike for Vector3<f32> {
    #[inline]
    fn x(&self) -> f32 {
        self[0]
    }
    #[inline]
    fn y(&self) -> f32 {
        self[1]
    }
    #[inline]
    fn z(&self) -> f32 {
        self[2]
    }
}

/// Alignment terms added in quadrature to every hit's variances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceModel {
    /// Radial alignment uncertainty (mm).
    pub r_align: f32,
    /// Longitudinal alignment uncertainty (mm).
    pub z_align: f32,
}

impl VarianceModel {
    #[inline]
    pub fn apply(&self, variance_r: f32, variance_z: f32) -> (f32, f32) {
        (
            variance_r + self.r_align * self.r_align,
            variance_z + self.z_align * self.z_align,
        )
    }
}

/// Internal space point in the beam-centred frame. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub phi: f32,
    pub variance_r: f32,
    pub variance_z: f32,
    pub id: SpacePointId,
}

impl SpacePoint {
    /// Normalises an external hit. `beam` is subtracted from the transverse position.
    pub fn from_hit<P: SpacePointLike + ?Sized>(
        hit: &P,
        id: SpacePointId,
        beam: &Vector2<f32>,
        variance: &VarianceModel,
    ) -> Self {
        let transverse = Vector2::new(hit.x(), hit.y()) - beam;
        let (variance_r, variance_z) = variance.apply(hit.variance_r(), hit.variance_z());
        Self {
            x: transverse.x,
            y: transverse.y,
            z: hit.z(),
            r: transverse.norm(),
            phi: transverse.y.atan2(transverse.x),
            variance_r,
            variance_z,
            id,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }
}
