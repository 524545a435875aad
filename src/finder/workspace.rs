//! Per-worker scratch buffers for the seed search.
//!
//! One workspace serves a whole sequence of grid bins, so the doublet and
//! candidate vectors are allocated once per worker instead of once per middle
//! point. Counters accumulate until the owner takes them.
use crate::diagnostics::SearchStage;
use crate::doublets::Doublet;
use crate::triplets::{TripletCandidate, TripletScratch};

#[derive(Debug, Default)]
pub struct SeedingWorkspace {
    pub(crate) bottom_bins: Vec<usize>,
    pub(crate) top_bins: Vec<usize>,
    pub(crate) bottoms: Vec<Doublet>,
    pub(crate) tops: Vec<Doublet>,
    pub(crate) triplets: TripletScratch,
    pub(crate) candidates: Vec<TripletCandidate>,
    pub(crate) counters: SearchStage,
}

impl SeedingWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulated counters and resets them.
    pub fn take_counters(&mut self) -> SearchStage {
        std::mem::take(&mut self.counters)
    }

    pub fn counters(&self) -> &SearchStage {
        &self.counters
    }
}
