//! Triplet search: bottom × top cross product with physics cuts.
//!
//! For each bottom doublet the tops are scanned in order and checked against
//! - the multiple-scattering budget of the minimum-pT track (polar angle),
//! - the minimum helix diameter (transverse momentum),
//! - the scattering budget re-evaluated with the triplet's own pT,
//! - the transverse impact parameter.
//!
//! Accepted tops of one bottom are handed to the seed filter together, since
//! the compatible-seed bonus compares them with each other.

use crate::conformal::LinCircle;
use crate::doublets::Doublet;
use crate::filter::SeedFilter;
use crate::finder::TripletCuts;
use crate::grid::SpacePointGrid;
use crate::units::PT_PER_TESLA_MM;
use serde::Serialize;

/// Highland multiple-scattering constant (MeV).
const HIGHLAND_MEV: f32 = 13.6;

/// Quantities derived once from [`TripletCuts`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCuts {
    pub highland: f32,
    pub max_scattering_angle2: f32,
    /// MeV per mm of helix radius.
    pub pt_per_helix_radius: f32,
    pub min_helix_diameter2: f32,
    pub pt2_per_radius: f32,
    pub sigma_scattering2: f32,
    /// Squared scattering angle of a `max_pt_scattering` track.
    pub min_scattering_angle2: f32,
    pub max_pt_scattering: f32,
    pub impact_max: f32,
}

impl DerivedCuts {
    pub fn from_config(cuts: &TripletCuts) -> Self {
        let x0 = cuts.rad_length_per_seed;
        let highland = HIGHLAND_MEV * x0.sqrt() * (1.0 + 0.038 * x0.ln());
        let pt_per_helix_radius = PT_PER_TESLA_MM * cuts.b_field_in_z;
        let min_helix_diameter = 2.0 * cuts.min_pt / pt_per_helix_radius;
        let max_scattering_angle = highland / cuts.min_pt;
        let pt_per_radius = highland / pt_per_helix_radius;
        let min_scattering_angle = highland / cuts.max_pt_scattering;
        Self {
            highland,
            max_scattering_angle2: max_scattering_angle * max_scattering_angle,
            pt_per_helix_radius,
            min_helix_diameter2: min_helix_diameter * min_helix_diameter,
            pt2_per_radius: pt_per_radius * pt_per_radius,
            sigma_scattering2: cuts.sigma_scattering * cuts.sigma_scattering,
            min_scattering_angle2: min_scattering_angle * min_scattering_angle,
            max_pt_scattering: cuts.max_pt_scattering,
            impact_max: cuts.impact_max,
        }
    }
}

/// Polar-angle compatibility check shared by both scattering cuts.
///
/// Returns true when the slope difference cannot be explained by the
/// combined measurement error plus the scattering budget. Equality accepts.
#[inline]
pub fn exceeds_scattering_budget(delta_cot2: f32, error2: f32, budget2: f32) -> bool {
    if delta_cot2 <= error2 {
        return false;
    }
    let excess = delta_cot2.sqrt() - error2.sqrt();
    excess * excess > budget2
}

/// Triplet accepted by the physics cuts, before and after weighting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripletCandidate {
    pub bottom: u32,
    pub middle: u32,
    pub top: u32,
    /// Signed 1/(2R) of the circle through the three points.
    pub inv_helix_diameter: f32,
    pub impact_parameter: f32,
    pub z_vertex: f32,
    pub weight: f32,
}

impl TripletCandidate {
    /// Signed curvature 1/R.
    #[inline]
    pub fn curvature(&self) -> f32 {
        2.0 * self.inv_helix_diameter
    }
}

/// Top accepted for the current bottom, waiting to be weighted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopMatch {
    pub top: u32,
    pub inv_helix_diameter: f32,
    pub impact_parameter: f32,
}

/// Scratch buffers reused across middle points.
#[derive(Clone, Debug, Default)]
pub struct TripletScratch {
    pub matches: Vec<TopMatch>,
    pub compatible_radii: Vec<f32>,
}

/// Runs the triplet cuts for one middle point and appends the weighted
/// candidates surviving the per-bottom filter to `out`.
///
/// Returns the number of triplets that passed the physics cuts.
#[allow(clippy::too_many_arguments)]
pub fn search_triplets(
    grid: &SpacePointGrid,
    middle: u32,
    bottoms: &[Doublet],
    tops: &[Doublet],
    cuts: &DerivedCuts,
    filter: &SeedFilter,
    scratch: &mut TripletScratch,
    out: &mut Vec<TripletCandidate>,
) -> usize {
    let m = grid.point(middle);
    let (var_r_m, var_z_m) = (m.variance_r, m.variance_z);
    let mut accepted = 0usize;

    for bottom in bottoms {
        let lb: &LinCircle = &bottom.lin;
        let i_sin2_theta = 1.0 + lb.cot_theta * lb.cot_theta;
        let scattering_budget2 = cuts.max_scattering_angle2 * i_sin2_theta * cuts.sigma_scattering2;

        scratch.matches.clear();
        for top in tops {
            let lt = &top.lin;
            let error2 = lt.er
                + lb.er
                + 2.0
                    * (lb.cot_theta * lt.cot_theta * var_r_m + var_z_m)
                    * lb.i_delta_r
                    * lt.i_delta_r;
            let delta_cot = lb.cot_theta - lt.cot_theta;
            let delta_cot2 = delta_cot * delta_cot;
            if exceeds_scattering_budget(delta_cot2, error2, scattering_budget2) {
                continue;
            }

            let du = lt.u - lb.u;
            if du == 0.0 {
                continue;
            }
            let a = (lt.v - lb.v) / du;
            let s2 = 1.0 + a * a;
            let b = lb.v - a * lb.u;
            if s2 < b * b * cuts.min_helix_diameter2 {
                continue;
            }

            let straight = b == 0.0;
            let pt_scattering2 = if !straight
                && cuts.pt_per_helix_radius * (s2 / (b * b)).sqrt() * 0.5 <= cuts.max_pt_scattering
            {
                4.0 * b * b / s2 * cuts.pt2_per_radius * i_sin2_theta * cuts.sigma_scattering2
            } else {
                cuts.min_scattering_angle2 * i_sin2_theta * cuts.sigma_scattering2
            };
            if exceeds_scattering_budget(delta_cot2, error2, pt_scattering2) {
                continue;
            }

            let impact = ((a - b * m.r) * m.r).abs();
            if impact > cuts.impact_max {
                continue;
            }

            scratch.matches.push(TopMatch {
                top: top.other,
                inv_helix_diameter: b / s2.sqrt(),
                impact_parameter: impact,
            });
        }

        if scratch.matches.is_empty() {
            continue;
        }
        accepted += scratch.matches.len();
        filter.score_bottom_group(
            grid.points(),
            bottom.other,
            middle,
            lb.z_origin,
            &scratch.matches,
            &mut scratch.compatible_radii,
            out,
        );
    }
    accepted
}
