//! Neighbour bin lookup strategies.
//!
//! A [`BinFinder`] maps the (phi, z) bin of a middle point to the set of bins
//! searched for bottom or top partners. The seed finder holds one finder per
//! role, so the windows may be asymmetric. Closures with the same signature
//! are finders too.

use super::GridLayout;

/// Pure mapping from a middle bin to the global indices of candidate bins.
///
/// Implementations append to `out`; the caller clears it beforehand. The
/// result must be free of duplicates.
pub trait BinFinder: Send + Sync {
    fn find_bins(&self, phi_bin: usize, z_bin: usize, layout: &GridLayout, out: &mut Vec<usize>);
}

impl<F> BinFinder for F
where
    F: Fn(usize, usize, &GridLayout, &mut Vec<usize>) + Send + Sync,
{
    fn find_bins(&self, phi_bin: usize, z_bin: usize, layout: &GridLayout, out: &mut Vec<usize>) {
        self(phi_bin, z_bin, layout, out)
    }
}

/// Rectangular neighbourhood: `±phi_neighbors` in phi (wrapping on a periodic
/// axis) times a z window.
///
/// `z_bin_neighbors[z]` gives the `[lo, hi]` offsets for middle bin `z`; when
/// the list is empty (or shorter than the axis) `[-1, 1]` is used.
#[derive(Clone, Debug, Default)]
pub struct NeighborhoodBinFinder {
    pub phi_neighbors: usize,
    pub z_bin_neighbors: Vec<[i32; 2]>,
}

impl NeighborhoodBinFinder {
    pub fn new(phi_neighbors: usize, z_bin_neighbors: Vec<[i32; 2]>) -> Self {
        Self {
            phi_neighbors,
            z_bin_neighbors,
        }
    }

    fn z_window(&self, z_bin: usize, z_bins: usize) -> (usize, usize) {
        let [lo, hi] = self.z_bin_neighbors.get(z_bin).copied().unwrap_or([-1, 1]);
        let last = z_bins as i64 - 1;
        let lo = (z_bin as i64 + lo as i64).clamp(0, last) as usize;
        let hi = (z_bin as i64 + hi as i64).clamp(0, last) as usize;
        (lo.min(hi), hi.max(lo))
    }
}

impl BinFinder for NeighborhoodBinFinder {
    fn find_bins(&self, phi_bin: usize, z_bin: usize, layout: &GridLayout, out: &mut Vec<usize>) {
        let n_phi = layout.phi.bins as i64;
        let (z_lo, z_hi) = self.z_window(z_bin, layout.z.bins());
        let reach = (self.phi_neighbors as i64).min(n_phi);
        let start = out.len();
        for offset in -reach..=reach {
            let p = phi_bin as i64 + offset;
            let p = if layout.phi.periodic {
                p.rem_euclid(n_phi)
            } else if p < 0 || p >= n_phi {
                continue;
            } else {
                p
            };
            for z in z_lo..=z_hi {
                out.push(layout.bin_index(p as usize, z));
            }
        }
        // Small periodic axes wrap onto themselves.
        let tail = &mut out[start..];
        tail.sort_unstable();
        let mut unique = start;
        for i in start..out.len() {
            if i == start || out[i] != out[unique - 1] {
                out[unique] = out[i];
                unique += 1;
            }
        }
        out.truncate(unique);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{PhiAxis, ZAxis};
    use std::f32::consts::PI;

    fn layout(phi_bins: usize, z_bins: usize) -> GridLayout {
        GridLayout::new(
            PhiAxis::new(-PI, PI, phi_bins).expect("phi"),
            ZAxis::uniform(-100.0, 100.0, z_bins).expect("z"),
        )
    }

    #[test]
    fn default_window_is_three_by_three() {
        let layout = layout(10, 5);
        let finder = NeighborhoodBinFinder::new(1, Vec::new());
        let mut out = Vec::new();
        finder.find_bins(4, 2, &layout, &mut out);
        assert_eq!(out.len(), 9);
        for phi in 3..=5 {
            for z in 1..=3 {
                assert!(out.contains(&layout.bin_index(phi, z)));
            }
        }
    }

    #[test]
    fn phi_wraps_and_z_clamps() {
        let layout = layout(10, 5);
        let finder = NeighborhoodBinFinder::new(1, Vec::new());
        let mut out = Vec::new();
        finder.find_bins(0, 0, &layout, &mut out);
        assert_eq!(out.len(), 6);
        assert!(out.contains(&layout.bin_index(9, 0)));
        assert!(out.contains(&layout.bin_index(1, 1)));
    }

    #[test]
    fn small_periodic_axis_has_no_duplicates() {
        let layout = layout(2, 1);
        let finder = NeighborhoodBinFinder::new(1, Vec::new());
        let mut out = Vec::new();
        finder.find_bins(0, 0, &layout, &mut out);
        assert_eq!(out, vec![layout.bin_index(0, 0), layout.bin_index(1, 0)]);
    }

    #[test]
    fn explicit_z_neighbors_are_asymmetric() {
        let layout = layout(4, 5);
        let finder = NeighborhoodBinFinder::new(0, vec![[0, 2]; 5]);
        let mut out = Vec::new();
        finder.find_bins(1, 1, &layout, &mut out);
        assert_eq!(
            out,
            vec![
                layout.bin_index(1, 1),
                layout.bin_index(1, 2),
                layout.bin_index(1, 3)
            ]
        );
    }

    #[test]
    fn closures_are_finders() {
        let layout = layout(4, 4);
        let same_bin_only = |phi: usize, z: usize, l: &GridLayout, out: &mut Vec<usize>| {
            out.push(l.bin_index(phi, z));
        };
        let mut out = Vec::new();
        same_bin_only.find_bins(2, 3, &layout, &mut out);
        assert_eq!(out, vec![layout.bin_index(2, 3)]);
    }
}
