//! Space point grid: a (phi, z) histogram with radius-ordered bins.
//!
//! Overview
//! - Every hit is normalised once ([`SpacePoint::from_hit`]) and folded into
//!   the observed [`Extent`].
//! - Points outside the (r, z, phi) acceptance are dropped, not binned.
//! - Accepted points are bucketed by radius (`bin_size_r`) and inserted bucket
//!   by bucket, so bins come out almost sorted; every bin touched more than
//!   once is then sorted by radius.
//! - The grid owns the points in an arena; bins and every later stage refer
//!   to them by `u32` index.
//!
//! Construction side effects (touched bins, extent, drop count) are returned
//! in [`GridBuild`] instead of being stored on the grid.

mod axes;
mod bin_finder;
mod extent;

pub use axes::{GridLayout, PhiAxis, ZAxis};
pub use bin_finder::{BinFinder, NeighborhoodBinFinder};
pub use extent::{Extent, Range1D};

use crate::error::SeedingError;
use crate::finder::GridConfig;
use crate::spacepoint::{SpacePoint, SpacePointId, SpacePointLike};
use log::{debug, warn};
use nalgebra::Vector2;

/// Binned, read-only space points of one event.
#[derive(Clone, Debug)]
pub struct SpacePointGrid {
    layout: GridLayout,
    points: Vec<SpacePoint>,
    bins: Vec<Vec<u32>>,
}

/// Result of [`SpacePointGrid::build`].
#[derive(Clone, Debug)]
pub struct GridBuild {
    pub grid: SpacePointGrid,
    /// Global indices of bins that received at least one point, ascending.
    pub touched_bins: Vec<usize>,
    /// Extent of every input hit, accepted or not.
    pub extent: Extent,
    /// Hits rejected by the acceptance window.
    pub dropped: usize,
}

impl SpacePointGrid {
    /// Bins `hits` into `layout`, applying the acceptance window of `config`.
    ///
    /// Fails only on an unusable radius bucket size. Empty input yields an
    /// empty grid.
    pub fn build<P: SpacePointLike>(
        hits: &[P],
        layout: GridLayout,
        config: &GridConfig,
    ) -> Result<GridBuild, SeedingError> {
        if !(config.bin_size_r.is_finite() && config.bin_size_r > 0.0) {
            return Err(SeedingError::InvalidBinning(format!(
                "bin_size_r must be positive, got {}",
                config.bin_size_r
            )));
        }
        if hits.len() > u32::MAX as usize {
            return Err(SeedingError::InvalidConfig(format!(
                "too many space points for one event: {}",
                hits.len()
            )));
        }

        let beam = Vector2::new(config.beam_pos[0], config.beam_pos[1]);
        let r_limit = config.r_max + beam.norm();
        let num_r_buckets = (r_limit / config.bin_size_r).ceil().max(1.0) as usize;

        let mut extent = Extent::default();
        let mut dropped = 0usize;
        let mut beyond_r = 0usize;
        let mut r_buckets: Vec<Vec<(SpacePoint, usize)>> = vec![Vec::new(); num_r_buckets];

        for (idx, hit) in hits.iter().enumerate() {
            let sp = SpacePoint::from_hit(hit, SpacePointId(idx as u32), &beam, &config.variance);
            extent.extend(sp.x, sp.y, sp.z, sp.r, sp.phi);

            if !(sp.r > 0.0) || sp.r < config.r_min || sp.z < config.z_min || sp.z > config.z_max
            {
                dropped += 1;
                continue;
            }
            let Some(bin) = layout.locate(sp.phi, sp.z) else {
                dropped += 1;
                continue;
            };
            let r_index = (sp.r / config.bin_size_r) as usize;
            if r_index >= num_r_buckets {
                dropped += 1;
                beyond_r += 1;
                continue;
            }
            r_buckets[r_index].push((sp, bin));
        }
        if beyond_r > 0 {
            warn!(
                "SpacePointGrid::build dropped {} points beyond r_max={} (+beam offset)",
                beyond_r, config.r_max
            );
        }

        let mut points = Vec::with_capacity(hits.len() - dropped);
        let mut bins: Vec<Vec<u32>> = vec![Vec::new(); layout.num_bins()];
        let mut touched = vec![false; layout.num_bins()];
        for bucket in r_buckets {
            for (sp, bin) in bucket {
                let arena_idx = points.len() as u32;
                points.push(sp);
                bins[bin].push(arena_idx);
                touched[bin] = true;
            }
        }

        let touched_bins: Vec<usize> = touched
            .iter()
            .enumerate()
            .filter_map(|(idx, &t)| t.then_some(idx))
            .collect();
        for &bin in &touched_bins {
            let entries = &mut bins[bin];
            if entries.len() > 1 {
                entries.sort_unstable_by(|&a, &b| {
                    points[a as usize].r.total_cmp(&points[b as usize].r)
                });
            }
        }

        debug!(
            "SpacePointGrid::build hits={} binned={} dropped={} touched_bins={}/{}",
            hits.len(),
            points.len(),
            dropped,
            touched_bins.len(),
            layout.num_bins()
        );

        Ok(GridBuild {
            grid: SpacePointGrid {
                layout,
                points,
                bins,
            },
            touched_bins,
            extent,
            dropped,
        })
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Arena of binned points.
    #[inline]
    pub fn points(&self) -> &[SpacePoint] {
        &self.points
    }

    #[inline]
    pub fn point(&self, index: u32) -> &SpacePoint {
        &self.points[index as usize]
    }

    /// Arena indices of a bin, ascending in radius.
    #[inline]
    pub fn bin(&self, index: usize) -> &[u32] {
        &self.bins[index]
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Global indices of non-empty bins in phi-major order.
    pub fn occupied_bins(&self) -> impl Iterator<Item = usize> + '_ {
        self.bins
            .iter()
            .enumerate()
            .filter_map(|(idx, b)| (!b.is_empty()).then_some(idx))
    }

    pub fn max_occupancy(&self) -> usize {
        self.bins.iter().map(Vec::len).max().unwrap_or(0)
    }
}
