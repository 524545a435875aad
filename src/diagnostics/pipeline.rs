use crate::diagnostics::TimingBreakdown;
use crate::grid::{Extent, GridLayout};
use crate::triplets::DerivedCuts;
use crate::types::Seed;
use serde::Serialize;
use std::ops::AddAssign;

/// Result produced by [`SeedFinder::find_seeds_with_diagnostics`](crate::SeedFinder).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingReport {
    pub seeds: Vec<Seed>,
    pub trace: SeedingTrace,
}

/// Per-event trace of what every stage did.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub grid: GridStage,
    pub search: SearchStage,
    pub derived_cuts: DerivedCuts,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub hits: usize,
    pub accepted: usize,
    pub dropped: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStage {
    pub layout: GridLayout,
    pub phi_bins: usize,
    pub z_bins: usize,
    pub touched_bins: usize,
    pub occupied_bins: usize,
    pub max_occupancy: usize,
    pub extent: Extent,
}

/// Counters of the doublet/triplet search, summed over workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStage {
    pub bins_processed: usize,
    pub middles_visited: usize,
    pub bottom_doublets: usize,
    pub top_doublets: usize,
    pub triplets: usize,
    pub seeds_before_global: usize,
    pub seeds_after_global: usize,
}

impl AddAssign for SearchStage {
    fn add_assign(&mut self, other: Self) {
        self.bins_processed += other.bins_processed;
        self.middles_visited += other.middles_visited;
        self.bottom_doublets += other.bottom_doublets;
        self.top_doublets += other.top_doublets;
        self.triplets += other.triplets;
        self.seeds_before_global += other.seeds_before_global;
        self.seeds_after_global += other.seeds_after_global;
    }
}

impl SeedingReport {
    /// One-line summary for logs and tools.
    pub fn summary(&self) -> String {
        let t = &self.trace;
        format!(
            "hits={} accepted={} bins={}x{} occupied={} middles={} doublets={}/{} triplets={} seeds={} ({}) total={:.2}ms",
            t.input.hits,
            t.input.accepted,
            t.grid.phi_bins,
            t.grid.z_bins,
            t.grid.occupied_bins,
            t.search.middles_visited,
            t.search.bottom_doublets,
            t.search.top_doublets,
            t.search.triplets,
            self.seeds.len(),
            format_global(&t.search),
            t.timings.total_ms
        )
    }
}

fn format_global(search: &SearchStage) -> String {
    if search.seeds_before_global == search.seeds_after_global {
        "no global removal".to_string()
    } else {
        format!("{} before global filter", search.seeds_before_global)
    }
}
