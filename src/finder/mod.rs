//! Seed finder orchestrating the grid, doublet, triplet and filter stages.
//!
//! Overview
//! - [`SeedFinder::new`] validates a [`SeedFinderConfig`] (which must be in
//!   internal units), derives the (phi, z) grid layout from the acceptance
//!   window and the minimum-pT deflection, and precomputes the scattering and
//!   curvature constants.
//! - Each event is binned once into a read-only [`SpacePointGrid`](crate::grid::SpacePointGrid).
//! - Occupied bins are independent units of work. With the `parallel` feature
//!   they run on the rayon pool, each worker owning a [`SeedingWorkspace`];
//!   per-bin results are concatenated in bin order so both modes produce the
//!   same seeds in the same order.
//!
//! Modules
//! - [`params`] – configuration types for every stage.
//! - `pipeline` – the [`SeedFinder`] implementation.
//! - `workspace` – reusable per-worker buffers.

pub mod params;
mod pipeline;
mod workspace;

pub use params::{DoubletCuts, GridConfig, NeighborConfig, SeedFinderConfig, TripletCuts};
pub use pipeline::SeedFinder;
pub use workspace::SeedingWorkspace;
