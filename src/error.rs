//! Error types for seed finding.
//!
//! Geometric outcomes ("no doublet", "no seed") are never errors. Only
//! configuration problems are reported, and always before any search runs.

use thiserror::Error;

/// Errors raised while configuring the seed finder or building its grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeedingError {
    /// The configuration was authored in external units and never converted.
    #[error("configuration is not expressed in internal units (mm, MeV, T); call `to_internal_units` first")]
    NotInInternalUnits,

    /// `to_internal_units` was called twice on the same configuration.
    #[error("configuration is already expressed in internal units")]
    AlreadyInInternalUnits,

    /// A cut or physics parameter is out of its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Grid binning would produce zero/negative bin counts or unordered edges.
    #[error("invalid grid binning: {0}")]
    InvalidBinning(String),
}
