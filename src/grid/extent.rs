//! Observed bounding extent of an event's space points.

use serde::Serialize;

/// Closed `[min, max]` range; empty until the first value is folded in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Range1D {
    pub min: f32,
    pub max: f32,
}

impl Default for Range1D {
    fn default() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }
}

impl Range1D {
    #[inline]
    pub fn extend(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn merge(&mut self, other: &Range1D) {
        if !other.is_empty() {
            self.extend(other.min);
            self.extend(other.max);
        }
    }
}

/// Per-coordinate extent of every hit seen, regardless of acceptance.
///
/// Positions are in the beam-centred frame used by the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Extent {
    pub x: Range1D,
    pub y: Range1D,
    pub z: Range1D,
    pub r: Range1D,
    pub phi: Range1D,
}

impl Extent {
    #[inline]
    pub fn extend(&mut self, x: f32, y: f32, z: f32, r: f32, phi: f32) {
        self.x.extend(x);
        self.y.extend(y);
        self.z.extend(z);
        self.r.extend(r);
        self.phi.extend(phi);
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}
