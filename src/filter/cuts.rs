//! Experiment-specific seed weighting and vetoes.

use crate::spacepoint::SpacePoint;
use crate::triplets::TripletCandidate;
use crate::units::UnitScale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Hooks the seed filter calls while ranking triplets.
///
/// All methods default to no-ops so an implementation overrides only what it
/// needs. Implementations are shared between worker threads.
pub trait SeedCuts: Send + Sync {
    /// Extra weight added to a triplet after the impact and compatibility terms.
    fn seed_weight(&self, _bottom: &SpacePoint, _middle: &SpacePoint, _top: &SpacePoint) -> f32 {
        0.0
    }

    /// Returns false to drop a single triplet given its final weight.
    fn single_seed_cut(
        &self,
        _weight: f32,
        _bottom: &SpacePoint,
        _middle: &SpacePoint,
        _top: &SpacePoint,
    ) -> bool {
        true
    }

    /// Trims the weight-sorted candidates of one middle point in place.
    fn cut_per_middle(&self, _candidates: &mut Vec<TripletCandidate>, _points: &[SpacePoint]) {}
}

/// Prefers seeds starting further out: `bottom.r · bottom_radius_weight`.
///
/// Combined with the `−impact` term of the filter this ranks low impact,
/// outer-starting seeds first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSeedCuts {
    pub bottom_radius_weight: f32,
}

impl Default for DefaultSeedCuts {
    fn default() -> Self {
        Self {
            bottom_radius_weight: 0.01,
        }
    }
}

impl SeedCuts for DefaultSeedCuts {
    fn seed_weight(&self, bottom: &SpacePoint, _middle: &SpacePoint, _top: &SpacePoint) -> f32 {
        bottom.r * self.bottom_radius_weight
    }
}

/// Radius-threshold cuts tuned for a pixel + strip barrel layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasCuts {
    /// Pixel/strip boundary (mm).
    pub strip_radius: f32,
    pub strip_bottom_weight: f32,
    pub pixel_top_weight: f32,
    /// Triplets with a strip bottom need at least this weight.
    pub strip_min_weight: f32,
    /// Candidates examined per middle after the best one.
    pub max_candidates: usize,
    pub keep_weight: f32,
    /// Bottoms beyond the innermost pixel layer are always kept.
    pub keep_bottom_radius: f32,
}

impl Default for AtlasCuts {
    fn default() -> Self {
        Self {
            strip_radius: 150.0,
            strip_bottom_weight: 400.0,
            pixel_top_weight: 200.0,
            strip_min_weight: 380.0,
            max_candidates: 5,
            keep_weight: 200.0,
            keep_bottom_radius: 43.0,
        }
    }
}

impl SeedCuts for AtlasCuts {
    fn seed_weight(&self, bottom: &SpacePoint, _middle: &SpacePoint, top: &SpacePoint) -> f32 {
        let mut weight = 0.0;
        if bottom.r > self.strip_radius {
            weight = self.strip_bottom_weight;
        }
        if top.r < self.strip_radius {
            weight = self.pixel_top_weight;
        }
        weight
    }

    fn single_seed_cut(
        &self,
        weight: f32,
        bottom: &SpacePoint,
        _middle: &SpacePoint,
        _top: &SpacePoint,
    ) -> bool {
        !(bottom.r > self.strip_radius && weight < self.strip_min_weight)
    }

    fn cut_per_middle(&self, candidates: &mut Vec<TripletCandidate>, points: &[SpacePoint]) {
        if candidates.len() <= 1 {
            return;
        }
        let examined = candidates.len().min(self.max_candidates);
        let mut kept = 1usize;
        for i in 1..examined {
            let c = candidates[i];
            if c.weight > self.keep_weight
                || points[c.bottom as usize].r > self.keep_bottom_radius
            {
                candidates[kept] = c;
                kept += 1;
            }
        }
        candidates.truncate(kept);
    }
}

/// Serializable selection of the built-in cuts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CutsConfig {
    Default(DefaultSeedCuts),
    Atlas(AtlasCuts),
}

impl Default for CutsConfig {
    fn default() -> Self {
        CutsConfig::Default(DefaultSeedCuts::default())
    }
}

impl CutsConfig {
    /// Converts cuts authored in `scale` units: radii scale with length,
    /// per-mm weights inversely.
    pub fn to_internal_units(&self, scale: &UnitScale) -> Self {
        let l = scale.length;
        match *self {
            CutsConfig::Default(cuts) => CutsConfig::Default(DefaultSeedCuts {
                bottom_radius_weight: cuts.bottom_radius_weight / l,
            }),
            CutsConfig::Atlas(cuts) => CutsConfig::Atlas(AtlasCuts {
                strip_radius: cuts.strip_radius * l,
                keep_bottom_radius: cuts.keep_bottom_radius * l,
                ..cuts
            }),
        }
    }

    pub fn into_cuts(self) -> Arc<dyn SeedCuts> {
        match self {
            CutsConfig::Default(cuts) => Arc::new(cuts),
            CutsConfig::Atlas(cuts) => Arc::new(cuts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacepoint::SpacePointId;

    fn at_radius(r: f32) -> SpacePoint {
        SpacePoint {
            x: r,
            y: 0.0,
            z: 0.0,
            r,
            phi: 0.0,
            variance_r: 0.0,
            variance_z: 0.0,
            id: SpacePointId(0),
        }
    }

    fn candidate(bottom: u32, weight: f32) -> TripletCandidate {
        TripletCandidate {
            bottom,
            middle: 0,
            top: 0,
            inv_helix_diameter: 0.0,
            impact_parameter: 0.0,
            z_vertex: 0.0,
            weight,
        }
    }

    #[test]
    fn default_cuts_favour_outer_bottoms() {
        let cuts = DefaultSeedCuts::default();
        let m = at_radius(100.0);
        let t = at_radius(150.0);
        assert!(
            cuts.seed_weight(&at_radius(60.0), &m, &t) > cuts.seed_weight(&at_radius(30.0), &m, &t)
        );
        assert!(cuts.single_seed_cut(-1e6, &at_radius(30.0), &m, &t));
    }

    #[test]
    fn atlas_weights_by_radius_threshold() {
        let cuts = AtlasCuts::default();
        let m = at_radius(200.0);
        assert_eq!(cuts.seed_weight(&at_radius(160.0), &m, &at_radius(300.0)), 400.0);
        assert_eq!(cuts.seed_weight(&at_radius(30.0), &at_radius(60.0), &at_radius(100.0)), 200.0);
        assert_eq!(cuts.seed_weight(&at_radius(100.0), &m, &at_radius(300.0)), 0.0);

        assert!(!cuts.single_seed_cut(379.0, &at_radius(160.0), &m, &m));
        assert!(cuts.single_seed_cut(380.0, &at_radius(160.0), &m, &m));
        assert!(cuts.single_seed_cut(0.0, &at_radius(100.0), &m, &m));
    }

    #[test]
    fn atlas_per_middle_keeps_best_and_strong_followers() {
        let points = vec![at_radius(30.0), at_radius(50.0)];
        let mut candidates = vec![
            candidate(0, 500.0), // best, always kept
            candidate(0, 300.0), // weight above 200
            candidate(0, 100.0), // inner bottom, low weight
            candidate(1, 50.0),  // bottom beyond 43 mm
            candidate(1, 40.0),
            candidate(1, 30.0), // beyond the first five
        ];
        AtlasCuts::default().cut_per_middle(&mut candidates, &points);
        let weights: Vec<f32> = candidates.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![500.0, 300.0, 50.0, 40.0]);
    }

    #[test]
    fn cuts_config_parses_tagged_json() {
        let cfg: CutsConfig = serde_json::from_str(r#"{ "kind": "atlas", "strip_radius": 120.0 }"#)
            .expect("parse");
        match cfg {
            CutsConfig::Atlas(a) => {
                assert_eq!(a.strip_radius, 120.0);
                assert_eq!(a.max_candidates, 5);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(CutsConfig::default(), CutsConfig::Default(DefaultSeedCuts::default()));
    }
}
