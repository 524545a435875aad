//! Seed finder orchestrating grid construction, search and filtering.
//!
//! Typical usage:
//! ```no_run
//! use seed_finder::{RawSpacePoint, SeedFinder, SeedFinderConfig};
//!
//! # fn example(hits: Vec<RawSpacePoint>) -> Result<(), seed_finder::SeedingError> {
//! let finder = SeedFinder::new(SeedFinderConfig::default())?;
//! let report = finder.find_seeds_with_diagnostics(&hits)?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

// Stages
// - Grid: normalise and bin the hits (`SpacePointGrid::build`).
// - Search: per occupied bin, resolve the neighbour bins once, then per middle
//   point run the bottom/top doublet search, the triplet cuts and the
//   per-middle filter. Bins run in parallel when enabled; results are
//   concatenated in bin order.
// - Global filter: optional event-wide de-duplication.

use super::params::SeedFinderConfig;
use super::workspace::SeedingWorkspace;
use crate::conformal::DoubletRole;
use crate::diagnostics::{
    elapsed_ms, GridStage, InputDescriptor, SearchStage, SeedingReport, SeedingTrace,
    TimingBreakdown,
};
use crate::doublets::find_doublets;
use crate::error::SeedingError;
use crate::filter::{SeedCuts, SeedFilter};
use crate::grid::{BinFinder, GridBuild, GridLayout, NeighborhoodBinFinder, SpacePointGrid};
use crate::spacepoint::SpacePointLike;
use crate::triplets::{search_triplets, DerivedCuts};
use crate::types::Seed;
use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Triplet seed finder for one detector configuration.
///
/// Construction validates the configuration and derives the grid layout and
/// the physics constants once; every event then reuses them. The finder is
/// `Sync` and may be shared between threads processing different events.
pub struct SeedFinder {
    config: SeedFinderConfig,
    layout: GridLayout,
    derived: DerivedCuts,
    filter: SeedFilter,
    bottom_finder: Arc<dyn BinFinder>,
    top_finder: Arc<dyn BinFinder>,
}

impl std::fmt::Debug for SeedFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedFinder")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("derived", &self.derived)
            .finish_non_exhaustive()
    }
}

impl SeedFinder {
    /// Validate `config` and prepare the layout, derived cuts and default
    /// neighbour finders.
    pub fn new(config: SeedFinderConfig) -> Result<Self, SeedingError> {
        config.validate()?;
        let layout = GridLayout::from_config(&config)?;
        let derived = DerivedCuts::from_config(&config.triplets);
        let filter = SeedFilter::new(config.filter.clone());
        let neighbors = &config.neighbors;
        let bottom_finder: Arc<dyn BinFinder> = Arc::new(NeighborhoodBinFinder::new(
            neighbors.phi_neighbors,
            neighbors.bottom_z_neighbors.clone(),
        ));
        let top_finder: Arc<dyn BinFinder> = Arc::new(NeighborhoodBinFinder::new(
            neighbors.phi_neighbors,
            neighbors.top_z_neighbors.clone(),
        ));
        debug!(
            "SeedFinder::new grid={}x{} min_pt={} B={} parallel={}",
            layout.phi.bins,
            layout.z.bins(),
            config.triplets.min_pt,
            config.triplets.b_field_in_z,
            config.parallel
        );
        Ok(Self {
            config,
            layout,
            derived,
            filter,
            bottom_finder,
            top_finder,
        })
    }

    /// Replace the experiment cuts used by the seed filter.
    pub fn with_cuts(mut self, cuts: Arc<dyn SeedCuts>) -> Self {
        self.filter = SeedFilter::with_cuts(self.config.filter.clone(), cuts);
        self
    }

    /// Replace the neighbour lookup of the bottom and top searches.
    pub fn with_bin_finders(mut self, bottom: Arc<dyn BinFinder>, top: Arc<dyn BinFinder>) -> Self {
        self.bottom_finder = bottom;
        self.top_finder = top;
        self
    }

    pub fn config(&self) -> &SeedFinderConfig {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn derived_cuts(&self) -> &DerivedCuts {
        &self.derived
    }

    /// Bin `hits` with this finder's layout and acceptance window.
    pub fn build_grid<P: SpacePointLike>(&self, hits: &[P]) -> Result<GridBuild, SeedingError> {
        SpacePointGrid::build(hits, self.layout.clone(), &self.config.grid)
    }

    /// Run the full pipeline and return the seeds in discovery order.
    pub fn find_seeds<P: SpacePointLike>(&self, hits: &[P]) -> Result<Vec<Seed>, SeedingError> {
        Ok(self.find_seeds_with_diagnostics(hits)?.seeds)
    }

    /// Run the full pipeline and capture per-stage diagnostics.
    pub fn find_seeds_with_diagnostics<P: SpacePointLike>(
        &self,
        hits: &[P],
    ) -> Result<SeedingReport, SeedingError> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let grid_start = Instant::now();
        let GridBuild {
            grid,
            touched_bins,
            extent,
            dropped,
        } = self.build_grid(hits)?;
        timings.push_since("grid", grid_start);

        let bins: Vec<usize> = grid.occupied_bins().collect();
        debug!(
            "SeedFinder::find_seeds start hits={} binned={} bins={}",
            hits.len(),
            grid.len(),
            bins.len()
        );

        let search_start = Instant::now();
        let (seeds, mut search) = self.search_bins(&grid, &bins);
        timings.push_since("search", search_start);

        let global_start = Instant::now();
        search.seeds_before_global = seeds.len();
        let seeds = self.filter.filter_global(seeds);
        search.seeds_after_global = seeds.len();
        timings.push_since("global_filter", global_start);
        timings.total_ms = elapsed_ms(total_start);

        debug!(
            "SeedFinder::find_seeds done middles={} triplets={} seeds={} ({:.2}ms)",
            search.middles_visited,
            search.triplets,
            seeds.len(),
            timings.total_ms
        );

        let grid_stage = GridStage {
            layout: self.layout.clone(),
            phi_bins: self.layout.phi.bins,
            z_bins: self.layout.z.bins(),
            touched_bins: touched_bins.len(),
            occupied_bins: bins.len(),
            max_occupancy: grid.max_occupancy(),
            extent,
        };
        Ok(SeedingReport {
            seeds,
            trace: SeedingTrace {
                input: InputDescriptor {
                    hits: hits.len(),
                    accepted: grid.len(),
                    dropped,
                },
                timings,
                grid: grid_stage,
                search,
                derived_cuts: self.derived,
            },
        })
    }

    /// Search every occupied bin of a prebuilt grid. The global filter is not
    /// applied.
    pub fn search_grid(&self, grid: &SpacePointGrid) -> (Vec<Seed>, SearchStage) {
        let bins: Vec<usize> = grid.occupied_bins().collect();
        self.search_bins(grid, &bins)
    }

    fn search_bins(&self, grid: &SpacePointGrid, bins: &[usize]) -> (Vec<Seed>, SearchStage) {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                let per_bin: Vec<(Vec<Seed>, SearchStage)> = bins
                    .par_iter()
                    .map_init(SeedingWorkspace::new, |ws, &bin| {
                        let mut seeds = Vec::new();
                        self.process_bin(grid, bin, ws, &mut seeds);
                        (seeds, ws.take_counters())
                    })
                    .collect();
                let mut seeds = Vec::new();
                let mut stage = SearchStage::default();
                for (bin_seeds, counters) in per_bin {
                    seeds.extend(bin_seeds);
                    stage += counters;
                }
                return (seeds, stage);
            }
        }

        let mut ws = SeedingWorkspace::new();
        let mut seeds = Vec::new();
        for &bin in bins {
            self.process_bin(grid, bin, &mut ws, &mut seeds);
        }
        (seeds, ws.take_counters())
    }

    fn process_bin(
        &self,
        grid: &SpacePointGrid,
        bin: usize,
        ws: &mut SeedingWorkspace,
        out: &mut Vec<Seed>,
    ) {
        let layout = grid.layout();
        let (phi_bin, z_bin) = layout.bin_coords(bin);
        ws.bottom_bins.clear();
        self.bottom_finder
            .find_bins(phi_bin, z_bin, layout, &mut ws.bottom_bins);
        ws.top_bins.clear();
        self.top_finder
            .find_bins(phi_bin, z_bin, layout, &mut ws.top_bins);
        ws.counters.bins_processed += 1;

        let cuts = &self.config.doublets;
        let emitted_before = out.len();
        for &middle in grid.bin(bin) {
            if !cuts.accepts_middle_radius(grid.point(middle).r) {
                continue;
            }
            ws.counters.middles_visited += 1;

            ws.bottoms.clear();
            let n_bottom = find_doublets(
                grid,
                middle,
                DoubletRole::Bottom,
                &ws.bottom_bins,
                cuts,
                &mut ws.bottoms,
            );
            ws.counters.bottom_doublets += n_bottom;
            if n_bottom == 0 {
                continue;
            }
            ws.tops.clear();
            let n_top = find_doublets(
                grid,
                middle,
                DoubletRole::Top,
                &ws.top_bins,
                cuts,
                &mut ws.tops,
            );
            ws.counters.top_doublets += n_top;
            if n_top == 0 {
                continue;
            }

            ws.candidates.clear();
            let accepted = search_triplets(
                grid,
                middle,
                &ws.bottoms,
                &ws.tops,
                &self.derived,
                &self.filter,
                &mut ws.triplets,
                &mut ws.candidates,
            );
            ws.counters.triplets += accepted;
            self.filter
                .filter_for_middle(grid.points(), &mut ws.candidates, out);
        }
        trace!(
            "SeedFinder bin={} ({}, {}) middles={} seeds={}",
            bin,
            phi_bin,
            z_bin,
            grid.bin(bin).len(),
            out.len() - emitted_before
        );
    }
}
