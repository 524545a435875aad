//! Seed filter: weighting, per-middle selection and global de-duplication.
//!
//! Stages
//! - Per bottom: every accepted top gets `−impact · impact_weight_factor`,
//!   a bonus for each distinct compatible top radius (same curvature within
//!   `delta_inv_helix_diameter`) and the experiment weight from [`SeedCuts`].
//! - Per middle: candidates are ranked by weight, trimmed by the experiment
//!   cut and capped at `max_seeds_per_middle`.
//! - Per event: the optional [`GlobalDedup`] policy.

mod cuts;
mod global;

pub use cuts::{AtlasCuts, CutsConfig, DefaultSeedCuts, SeedCuts};
pub use global::GlobalDedup;

use crate::error::SeedingError;
use crate::spacepoint::SpacePoint;
use crate::triplets::{TopMatch, TripletCandidate};
use crate::types::Seed;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedFilterConfig {
    /// Curvature window (1/mm) within which two tops count as compatible.
    pub delta_inv_helix_diameter: f32,
    /// Weight lost per mm of impact parameter.
    pub impact_weight_factor: f32,
    pub compat_seed_weight: f32,
    /// Minimum radial separation (mm) of compatible tops.
    pub delta_r_min: f32,
    pub compat_seed_limit: usize,
    pub max_seeds_per_middle: usize,
    pub global: GlobalDedup,
}

impl Default for SeedFilterConfig {
    fn default() -> Self {
        Self {
            delta_inv_helix_diameter: 0.000_03,
            impact_weight_factor: 1.0,
            compat_seed_weight: 200.0,
            delta_r_min: 5.0,
            compat_seed_limit: 2,
            max_seeds_per_middle: 5,
            global: GlobalDedup::Disabled,
        }
    }
}

impl SeedFilterConfig {
    pub fn validate(&self) -> Result<(), SeedingError> {
        if self.max_seeds_per_middle == 0 {
            return Err(SeedingError::InvalidConfig(
                "max_seeds_per_middle must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("delta_inv_helix_diameter", self.delta_inv_helix_diameter),
            ("impact_weight_factor", self.impact_weight_factor),
            ("delta_r_min", self.delta_r_min),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SeedingError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !self.compat_seed_weight.is_finite() {
            return Err(SeedingError::InvalidConfig(format!(
                "compat_seed_weight must be finite, got {}",
                self.compat_seed_weight
            )));
        }
        if let GlobalDedup::CapPerOuterPair { max_per_pair: 0 } = self.global {
            return Err(SeedingError::InvalidConfig(
                "global max_per_pair must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Ranks triplets and turns the best of them into [`Seed`]s.
#[derive(Clone)]
pub struct SeedFilter {
    config: SeedFilterConfig,
    cuts: Arc<dyn SeedCuts>,
}

impl std::fmt::Debug for SeedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedFilter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SeedFilter {
    /// Filter with [`DefaultSeedCuts`].
    pub fn new(config: SeedFilterConfig) -> Self {
        Self::with_cuts(config, Arc::new(DefaultSeedCuts::default()))
    }

    pub fn with_cuts(config: SeedFilterConfig, cuts: Arc<dyn SeedCuts>) -> Self {
        Self { config, cuts }
    }

    pub fn config(&self) -> &SeedFilterConfig {
        &self.config
    }

    /// Weights the tops accepted for one bottom and appends the survivors of
    /// the single-seed cut to `out`.
    #[allow(clippy::too_many_arguments)]
    pub fn score_bottom_group(
        &self,
        points: &[SpacePoint],
        bottom: u32,
        middle: u32,
        z_vertex: f32,
        matches: &[TopMatch],
        compatible_radii: &mut Vec<f32>,
        out: &mut Vec<TripletCandidate>,
    ) {
        let cfg = &self.config;
        let b = &points[bottom as usize];
        let m = &points[middle as usize];

        for (i, current) in matches.iter().enumerate() {
            let t = &points[current.top as usize];
            let mut weight = -current.impact_parameter * cfg.impact_weight_factor;
            let lower = current.inv_helix_diameter - cfg.delta_inv_helix_diameter;
            let upper = current.inv_helix_diameter + cfg.delta_inv_helix_diameter;

            compatible_radii.clear();
            for (j, other) in matches.iter().enumerate() {
                if compatible_radii.len() >= cfg.compat_seed_limit {
                    break;
                }
                if i == j {
                    continue;
                }
                let other_r = points[other.top as usize].r;
                if (t.r - other_r).abs() < cfg.delta_r_min {
                    continue;
                }
                if other.inv_helix_diameter < lower || other.inv_helix_diameter > upper {
                    continue;
                }
                if compatible_radii
                    .iter()
                    .any(|&seen| (seen - other_r).abs() < cfg.delta_r_min)
                {
                    continue;
                }
                compatible_radii.push(other_r);
                weight += cfg.compat_seed_weight;
            }

            weight += self.cuts.seed_weight(b, m, t);
            if !self.cuts.single_seed_cut(weight, b, m, t) {
                continue;
            }
            out.push(TripletCandidate {
                bottom,
                middle,
                top: current.top,
                inv_helix_diameter: current.inv_helix_diameter,
                impact_parameter: current.impact_parameter,
                z_vertex,
                weight,
            });
        }
    }

    /// Ranks the candidates of one middle point and appends at most
    /// `max_seeds_per_middle` seeds to `out`. Returns the number appended.
    pub fn filter_for_middle(
        &self,
        points: &[SpacePoint],
        candidates: &mut Vec<TripletCandidate>,
        out: &mut Vec<Seed>,
    ) -> usize {
        if candidates.is_empty() {
            return 0;
        }
        candidates.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.bottom.cmp(&b.bottom))
                .then_with(|| a.top.cmp(&b.top))
        });
        self.cuts.cut_per_middle(candidates, points);
        candidates.truncate(self.config.max_seeds_per_middle);

        out.extend(candidates.iter().map(|c| Seed {
            bottom: points[c.bottom as usize].id,
            middle: points[c.middle as usize].id,
            top: points[c.top as usize].id,
            z_vertex: c.z_vertex,
            quality: c.weight,
        }));
        candidates.len()
    }

    /// Event-wide policy run after all middle points.
    pub fn filter_global(&self, seeds: Vec<Seed>) -> Vec<Seed> {
        self.config.global.apply(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacepoint::SpacePointId;

    fn point(id: u32, r: f32) -> SpacePoint {
        SpacePoint {
            x: r,
            y: 0.0,
            z: 0.0,
            r,
            phi: 0.0,
            variance_r: 0.0,
            variance_z: 0.0,
            id: SpacePointId(id),
        }
    }

    struct NoWeight;
    impl SeedCuts for NoWeight {}

    fn filter(config: SeedFilterConfig) -> SeedFilter {
        SeedFilter::with_cuts(config, Arc::new(NoWeight))
    }

    fn top(top: u32, inv_helix_diameter: f32, impact_parameter: f32) -> TopMatch {
        TopMatch {
            top,
            inv_helix_diameter,
            impact_parameter,
        }
    }

    #[test]
    fn compatible_tops_earn_bonus_once_per_radius() {
        // bottom, middle, then tops at 100, 101 (too close to 100), 120, 140.
        let points = vec![
            point(0, 30.0),
            point(1, 60.0),
            point(2, 100.0),
            point(3, 101.0),
            point(4, 120.0),
            point(5, 140.0),
        ];
        let matches = vec![
            top(2, 1e-4, 1.0),
            top(3, 1e-4, 0.0),
            top(4, 1e-4, 0.0),
            top(5, 1e-4, 0.0),
        ];
        let mut out = Vec::new();
        let mut scratch = Vec::new();
        let cfg = SeedFilterConfig {
            compat_seed_limit: 5,
            ..Default::default()
        };
        filter(cfg).score_bottom_group(&points, 0, 1, 0.5, &matches, &mut scratch, &mut out);
        assert_eq!(out.len(), 4);
        // Top at 100: 101 is too close, 120 and 140 count.
        assert_eq!(out[0].weight, -1.0 + 400.0);
        // Top at 120: 100 counts, 101 is within 5 mm of it, 140 counts.
        assert_eq!(out[2].weight, 400.0);
        assert!(out.iter().all(|c| c.z_vertex == 0.5));
    }

    #[test]
    fn compat_limit_and_curvature_window() {
        let points = vec![
            point(0, 30.0),
            point(1, 60.0),
            point(2, 100.0),
            point(3, 120.0),
            point(4, 140.0),
            point(5, 160.0),
        ];
        let matches = vec![
            top(2, 1e-4, 0.0),
            top(3, 1e-4, 0.0),
            top(4, 1e-4, 0.0),
            top(5, 1e-3, 0.0), // different curvature
        ];
        let mut out = Vec::new();
        let mut scratch = Vec::new();
        filter(SeedFilterConfig::default())
            .score_bottom_group(&points, 0, 1, 0.0, &matches, &mut scratch, &mut out);
        assert_eq!(out[0].weight, 400.0); // capped at two
        assert_eq!(out[3].weight, 0.0);
    }

    #[test]
    fn per_middle_ranks_and_caps() {
        let points: Vec<SpacePoint> = (0..8)
            .map(|i| point(100 + i, 10.0 * (i + 1) as f32))
            .collect();
        let mut candidates: Vec<TripletCandidate> = (0..6)
            .map(|i| TripletCandidate {
                bottom: i as u32 % 2,
                middle: 2,
                top: 3 + i as u32 % 5,
                inv_helix_diameter: 0.0,
                impact_parameter: 0.0,
                z_vertex: i as f32,
                weight: [1.0, 5.0, 3.0, 5.0, 0.0, 2.0][i],
            })
            .collect();
        let cfg = SeedFilterConfig {
            max_seeds_per_middle: 3,
            ..Default::default()
        };
        let mut seeds = Vec::new();
        let n = filter(cfg).filter_for_middle(&points, &mut candidates, &mut seeds);
        assert_eq!(n, 3);
        let qualities: Vec<f32> = seeds.iter().map(|s| s.quality).collect();
        assert_eq!(qualities, vec![5.0, 5.0, 3.0]);
        // Equal weights and bottoms: the lower top arena index goes first.
        assert_eq!(seeds[0].top, SpacePointId(104));
        assert_eq!(seeds[1].top, SpacePointId(106));
        assert_eq!(seeds[0].middle, SpacePointId(102));
    }

    #[test]
    fn zero_seed_cap_is_invalid() {
        let cfg = SeedFilterConfig {
            max_seeds_per_middle: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(SeedFilterConfig::default().validate().is_ok());
    }
}
