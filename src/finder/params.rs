//! Parameter types configuring the seed finder stages.
//!
//! The knobs are grouped by stage: grid acceptance and binning, neighbour
//! lookup, doublet cuts, triplet physics cuts and the seed filter. All values
//! are in internal units (mm, MeV, T); see [`crate::units`].
//!
//! Defaults describe a silicon tracker in a 2 T solenoid with a 500 MeV pT
//! threshold. For tuning, start with the doublet windows and `min_pt`.

use crate::error::SeedingError;
use crate::filter::SeedFilterConfig;
use crate::spacepoint::VarianceModel;
use crate::units::UnitScale;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Top-level configuration consumed by [`SeedFinder`](super::SeedFinder).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedFinderConfig {
    /// Must be true before the finder accepts the configuration.
    pub in_internal_units: bool,
    /// Process grid bins with rayon when the `parallel` feature is enabled.
    pub parallel: bool,
    pub grid: GridConfig,
    pub neighbors: NeighborConfig,
    pub doublets: DoubletCuts,
    pub triplets: TripletCuts,
    pub filter: SeedFilterConfig,
}

impl Default for SeedFinderConfig {
    fn default() -> Self {
        Self {
            in_internal_units: true,
            parallel: true,
            grid: GridConfig::default(),
            neighbors: NeighborConfig::default(),
            doublets: DoubletCuts::default(),
            triplets: TripletCuts::default(),
            filter: SeedFilterConfig::default(),
        }
    }
}

/// Acceptance window and binning of the space point grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Points below this radius are not binned.
    pub r_min: f32,
    /// Outer radius of the tracker; also bounds the radius pre-sort buckets.
    pub r_max: f32,
    pub z_min: f32,
    pub z_max: f32,
    pub phi_min: f32,
    pub phi_max: f32,
    /// Radius bucket width used to pre-sort points before binning.
    pub bin_size_r: f32,
    /// Transverse beam position subtracted from every hit.
    pub beam_pos: [f32; 2],
    pub variance: VarianceModel,
    /// Explicit phi bin count. `None` derives it from the min-pT deflection.
    pub phi_bins: Option<usize>,
    /// Number of phi bins a min-pT track may sweep; larger means finer bins.
    pub phi_bin_deflection_coverage: u32,
    pub max_phi_bins: usize,
    /// Explicit z bin edges. `None` uses `cot_theta_max · delta_r_max` wide bins.
    pub z_bin_edges: Option<Vec<f32>>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            r_min: 0.0,
            r_max: 600.0,
            z_min: -2800.0,
            z_max: 2800.0,
            phi_min: -PI,
            phi_max: PI,
            bin_size_r: 1.0,
            beam_pos: [0.0, 0.0],
            variance: VarianceModel::default(),
            phi_bins: None,
            phi_bin_deflection_coverage: 1,
            max_phi_bins: 10_000,
            z_bin_edges: None,
        }
    }
}

/// Neighbour windows used by the default [`NeighborhoodBinFinder`](crate::grid::NeighborhoodBinFinder).
///
/// `*_z_neighbors` hold one `[lo, hi]` offset pair per z bin. An empty list
/// means `[-1, 1]` for every bin.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborConfig {
    pub phi_neighbors: usize,
    pub bottom_z_neighbors: Vec<[i32; 2]>,
    pub top_z_neighbors: Vec<[i32; 2]>,
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self {
            phi_neighbors: 1,
            bottom_z_neighbors: Vec::new(),
            top_z_neighbors: Vec::new(),
        }
    }
}

/// Pairwise compatibility cuts applied around a middle point.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubletCuts {
    pub delta_r_min_bottom: f32,
    pub delta_r_max_bottom: f32,
    pub delta_r_min_top: f32,
    pub delta_r_max_top: f32,
    /// Maximum |cot θ| of a doublet (2.7 in pseudorapidity ≈ 7.4).
    pub cot_theta_max: f32,
    /// z window at r = 0 the doublet line must cross.
    pub collision_region_min: f32,
    pub collision_region_max: f32,
    /// Optional cap on |Δz| between the two points.
    pub delta_z_max: Option<f32>,
    /// Optional `[r_min, r_max]` window for middle points.
    pub r_range_middle: Option<[f32; 2]>,
}

impl Default for DoubletCuts {
    fn default() -> Self {
        Self {
            delta_r_min_bottom: 5.0,
            delta_r_max_bottom: 160.0,
            delta_r_min_top: 5.0,
            delta_r_max_top: 160.0,
            cot_theta_max: 7.40627,
            collision_region_min: -250.0,
            collision_region_max: 250.0,
            delta_z_max: None,
            r_range_middle: None,
        }
    }
}

impl DoubletCuts {
    pub fn delta_r_max(&self) -> f32 {
        self.delta_r_max_bottom.max(self.delta_r_max_top)
    }

    #[inline]
    pub fn accepts_middle_radius(&self, r: f32) -> bool {
        match self.r_range_middle {
            Some([lo, hi]) => r >= lo && r <= hi,
            None => true,
        }
    }
}

/// Physics cuts applied to bottom–middle–top combinations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TripletCuts {
    /// Minimum transverse momentum (MeV).
    pub min_pt: f32,
    /// Solenoid field along z (T).
    pub b_field_in_z: f32,
    /// Material budget traversed by a seed, in radiation lengths.
    pub rad_length_per_seed: f32,
    /// Number of standard deviations of multiple scattering tolerated.
    pub sigma_scattering: f32,
    /// Above this pT the scattering allowance stops shrinking (MeV).
    pub max_pt_scattering: f32,
    /// Maximum transverse impact parameter (mm).
    pub impact_max: f32,
}

impl Default for TripletCuts {
    fn default() -> Self {
        Self {
            min_pt: 500.0,
            b_field_in_z: 2.0,
            rad_length_per_seed: 0.05,
            sigma_scattering: 5.0,
            max_pt_scattering: 10_000.0,
            impact_max: 20.0,
        }
    }
}

impl SeedFinderConfig {
    /// Converts a configuration authored in `scale` units into internal units.
    ///
    /// Fails when the configuration has already been converted.
    pub fn to_internal_units(&self, scale: &UnitScale) -> Result<Self, SeedingError> {
        if self.in_internal_units {
            return Err(SeedingError::AlreadyInInternalUnits);
        }
        if !scale.is_valid() {
            return Err(SeedingError::InvalidConfig(format!(
                "unit scale factors must be positive and finite, got {scale:?}"
            )));
        }
        let l = scale.length;
        let mut out = self.clone();
        out.in_internal_units = true;

        let g = &mut out.grid;
        g.r_min *= l;
        g.r_max *= l;
        g.z_min *= l;
        g.z_max *= l;
        g.bin_size_r *= l;
        g.beam_pos = [g.beam_pos[0] * l, g.beam_pos[1] * l];
        g.variance.r_align *= l;
        g.variance.z_align *= l;
        if let Some(edges) = g.z_bin_edges.as_mut() {
            edges.iter_mut().for_each(|e| *e *= l);
        }

        let d = &mut out.doublets;
        d.delta_r_min_bottom *= l;
        d.delta_r_max_bottom *= l;
        d.delta_r_min_top *= l;
        d.delta_r_max_top *= l;
        d.collision_region_min *= l;
        d.collision_region_max *= l;
        d.delta_z_max = d.delta_z_max.map(|v| v * l);
        d.r_range_middle = d.r_range_middle.map(|[lo, hi]| [lo * l, hi * l]);

        let t = &mut out.triplets;
        t.min_pt *= scale.momentum;
        t.max_pt_scattering *= scale.momentum;
        t.b_field_in_z *= scale.field;
        t.impact_max *= l;

        let f = &mut out.filter;
        f.delta_r_min *= l;
        f.delta_inv_helix_diameter /= l;
        f.impact_weight_factor /= l;

        Ok(out)
    }

    /// Checks cut domains. Binning is validated separately by the grid layout.
    pub fn validate(&self) -> Result<(), SeedingError> {
        if !self.in_internal_units {
            return Err(SeedingError::NotInInternalUnits);
        }
        let invalid = |msg: String| Err(SeedingError::InvalidConfig(msg));

        let d = &self.doublets;
        for (name, lo, hi) in [
            ("bottom", d.delta_r_min_bottom, d.delta_r_max_bottom),
            ("top", d.delta_r_min_top, d.delta_r_max_top),
        ] {
            if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || hi <= lo {
                return invalid(format!(
                    "{name} delta-r window must satisfy 0 <= min < max, got [{lo}, {hi}]"
                ));
            }
        }
        if !(d.cot_theta_max.is_finite() && d.cot_theta_max > 0.0) {
            return invalid(format!("cot_theta_max must be positive, got {}", d.cot_theta_max));
        }
        if !(d.collision_region_min <= d.collision_region_max) {
            return invalid(format!(
                "collision region [{}, {}] is empty",
                d.collision_region_min, d.collision_region_max
            ));
        }
        if let Some(dz) = d.delta_z_max {
            if !(dz > 0.0) {
                return invalid(format!("delta_z_max must be positive, got {dz}"));
            }
        }
        if let Some([lo, hi]) = d.r_range_middle {
            if !(lo <= hi) {
                return invalid(format!("middle radius range [{lo}, {hi}] is empty"));
            }
        }

        let t = &self.triplets;
        for (name, value) in [
            ("min_pt", t.min_pt),
            ("b_field_in_z", t.b_field_in_z),
            ("rad_length_per_seed", t.rad_length_per_seed),
            ("sigma_scattering", t.sigma_scattering),
            ("max_pt_scattering", t.max_pt_scattering),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if !(t.impact_max.is_finite() && t.impact_max >= 0.0) {
            return invalid(format!("impact_max must be non-negative, got {}", t.impact_max));
        }

        self.filter.validate()
    }
}
