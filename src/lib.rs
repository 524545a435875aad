#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod finder;
pub mod spacepoint;
pub mod types;
pub mod units;

// Stage modules – public for tools and tests, but considered internals.
pub mod angle;
pub mod conformal;
pub mod doublets;
pub mod estimate;
pub mod filter;
pub mod grid;
pub mod triplets;

// Tool support.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points: finder + configuration + results.
pub use crate::error::SeedingError;
pub use crate::finder::{SeedFinder, SeedFinderConfig, SeedingWorkspace};
pub use crate::spacepoint::{RawSpacePoint, SpacePointId, SpacePointLike};
pub use crate::types::Seed;

// Diagnostics returned by the finder.
pub use crate::diagnostics::{SeedingReport, SeedingTrace};

// Pluggable strategies.
pub use crate::filter::{AtlasCuts, CutsConfig, DefaultSeedCuts, GlobalDedup, SeedCuts};
pub use crate::grid::{BinFinder, NeighborhoodBinFinder};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use seed_finder::prelude::*;
///
/// # fn main() -> Result<(), SeedingError> {
/// let hits = vec![
///     RawSpacePoint::new(30.0, 0.0, 30.0),
///     RawSpacePoint::new(80.0, 0.0, 80.0),
///     RawSpacePoint::new(140.0, 0.0, 140.0),
/// ];
/// let finder = SeedFinder::new(SeedFinderConfig::default())?;
/// for seed in finder.find_seeds(&hits)? {
///     println!("{:?} quality={:.2}", seed.space_points(), seed.quality);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{RawSpacePoint, Seed, SeedFinder, SeedFinderConfig, SeedingError};
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    // Stage runners.
    pub use crate::doublets::{find_doublets, Doublet};
    pub use crate::estimate::{estimate_track_params, TrackParamsEstimate};
    pub use crate::filter::SeedFilter;
    pub use crate::grid::{GridBuild, GridLayout, SpacePointGrid};
    pub use crate::triplets::{search_triplets, DerivedCuts, TripletCandidate};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        GridStage, InputDescriptor, SearchStage, StageTiming, TimingBreakdown,
    };
}
