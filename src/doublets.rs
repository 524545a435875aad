//! Doublet search around a middle space point.
//!
//! Bins are sorted by radius, so each neighbour bin contributes one contiguous
//! slice `[rM − ΔRmax, rM − ΔRmin]` (bottom) or `[rM + ΔRmin, rM + ΔRmax]`
//! (top), located with a binary search.

use crate::conformal::{DoubletRole, LinCircle};
use crate::finder::DoubletCuts;
use crate::grid::SpacePointGrid;
use serde::Serialize;

/// Compatible partner of a middle point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Doublet {
    /// Arena index of the partner.
    pub other: u32,
    pub lin: LinCircle,
}

/// Appends every partner of `middle` found in `bins` that passes the doublet
/// cuts. Returns the number of doublets appended.
pub fn find_doublets(
    grid: &SpacePointGrid,
    middle: u32,
    role: DoubletRole,
    bins: &[usize],
    cuts: &DoubletCuts,
    out: &mut Vec<Doublet>,
) -> usize {
    let m = grid.point(middle);
    let (r_lo, r_hi) = match role {
        DoubletRole::Bottom => (m.r - cuts.delta_r_max_bottom, m.r - cuts.delta_r_min_bottom),
        DoubletRole::Top => (m.r + cuts.delta_r_min_top, m.r + cuts.delta_r_max_top),
    };
    let start_len = out.len();
    let points = grid.points();

    for &bin in bins {
        let entries = grid.bin(bin);
        let first = entries.partition_point(|&idx| points[idx as usize].r < r_lo);
        for &idx in &entries[first..] {
            let o = &points[idx as usize];
            if o.r > r_hi {
                break;
            }
            if idx == middle {
                continue;
            }
            let delta_r = match role {
                DoubletRole::Bottom => m.r - o.r,
                DoubletRole::Top => o.r - m.r,
            };
            if delta_r <= 0.0 {
                continue;
            }
            let delta_z = match role {
                DoubletRole::Bottom => m.z - o.z,
                DoubletRole::Top => o.z - m.z,
            };
            if let Some(max_dz) = cuts.delta_z_max {
                if delta_z.abs() > max_dz {
                    continue;
                }
            }
            let cot_theta = delta_z / delta_r;
            if cot_theta.abs() > cuts.cot_theta_max {
                continue;
            }
            let z_origin = m.z - m.r * cot_theta;
            if z_origin < cuts.collision_region_min || z_origin > cuts.collision_region_max {
                continue;
            }
            out.push(Doublet {
                other: idx,
                lin: LinCircle::transform(m, o, role),
            });
        }
    }
    out.len() - start_len
}
