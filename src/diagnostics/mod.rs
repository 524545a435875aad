//! Diagnostics data model returned alongside the seeds.
//!
//! [`SeedingReport`] bundles the seeds of one event with a [`SeedingTrace`]
//! describing the input, the grid that was built, the search counters and the
//! stage timings. Everything serializes to camelCase JSON for the tools.

pub mod pipeline;
pub mod timing;

pub use pipeline::{GridStage, InputDescriptor, SearchStage, SeedingReport, SeedingTrace};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
