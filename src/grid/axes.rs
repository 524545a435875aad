//! Binning axes of the space point grid.
//!
//! The phi axis is uniform and periodic when it spans the full circle. Its
//! bin width follows the azimuthal deflection of a minimum-pT helix between
//! the middle and the outermost layer, so a compatible partner is found in
//! the neighbouring bins. The z axis is either uniform or given by explicit
//! edges.

use crate::angle::covers_full_circle;
use crate::error::SeedingError;
use crate::finder::SeedFinderConfig;
use crate::units::helix_radius;
use log::warn;
use serde::Serialize;

/// Uniform azimuth axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhiAxis {
    pub min: f32,
    pub max: f32,
    pub bins: usize,
    pub width: f32,
    pub periodic: bool,
}

impl PhiAxis {
    pub fn new(min: f32, max: f32, bins: usize) -> Result<Self, SeedingError> {
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(SeedingError::InvalidBinning(format!(
                "phi window [{min}, {max}] is empty"
            )));
        }
        if bins == 0 {
            return Err(SeedingError::InvalidBinning(
                "phi axis needs at least one bin".into(),
            ));
        }
        Ok(Self {
            min,
            max,
            bins,
            width: (max - min) / bins as f32,
            periodic: covers_full_circle(min, max),
        })
    }

    /// Bin of an azimuth inside the window; the upper edge maps to the last bin.
    #[inline]
    pub fn bin(&self, phi: f32) -> Option<usize> {
        if !(phi >= self.min && phi <= self.max) {
            return None;
        }
        let idx = ((phi - self.min) / self.width) as usize;
        Some(idx.min(self.bins - 1))
    }
}

/// z axis described by strictly increasing edges.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZAxis {
    pub edges: Vec<f32>,
}

impl ZAxis {
    pub fn from_edges(edges: Vec<f32>) -> Result<Self, SeedingError> {
        if edges.len() < 2 {
            return Err(SeedingError::InvalidBinning(format!(
                "z axis needs at least two edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SeedingError::InvalidBinning(
                "z bin edges must be finite and strictly increasing".into(),
            ));
        }
        Ok(Self { edges })
    }

    pub fn uniform(min: f32, max: f32, bins: usize) -> Result<Self, SeedingError> {
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(SeedingError::InvalidBinning(format!(
                "z window [{min}, {max}] is empty"
            )));
        }
        if bins == 0 {
            return Err(SeedingError::InvalidBinning(
                "z axis needs at least one bin".into(),
            ));
        }
        let width = (max - min) / bins as f32;
        let mut edges: Vec<f32> = (0..bins).map(|i| min + width * i as f32).collect();
        edges.push(max);
        Ok(Self { edges })
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.edges[0]
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.edges[self.edges.len() - 1]
    }

    #[inline]
    pub fn bin(&self, z: f32) -> Option<usize> {
        if !(z >= self.min() && z <= self.max()) {
            return None;
        }
        let upper = self.edges.partition_point(|&e| e <= z);
        Some(upper.saturating_sub(1).min(self.bins() - 1))
    }
}

/// (phi, z) layout of the grid. Bins are stored phi-major.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub phi: PhiAxis,
    pub z: ZAxis,
}

impl GridLayout {
    pub fn new(phi: PhiAxis, z: ZAxis) -> Self {
        Self { phi, z }
    }

    /// Derives the layout from the acceptance window and the physics cuts.
    pub fn from_config(config: &SeedFinderConfig) -> Result<Self, SeedingError> {
        let grid = &config.grid;
        let span_phi = grid.phi_max - grid.phi_min;
        if !(span_phi.is_finite() && span_phi > 0.0) {
            return Err(SeedingError::InvalidBinning(format!(
                "phi window [{}, {}] is empty",
                grid.phi_min, grid.phi_max
            )));
        }

        let phi_bins = match grid.phi_bins {
            Some(n) => n,
            None => derived_phi_bins(config, span_phi)?,
        };
        let phi = PhiAxis::new(grid.phi_min, grid.phi_max, phi_bins)?;

        let z = match &grid.z_bin_edges {
            Some(edges) => ZAxis::from_edges(edges.clone())?,
            None => {
                let span_z = grid.z_max - grid.z_min;
                if !(span_z.is_finite() && span_z > 0.0) {
                    return Err(SeedingError::InvalidBinning(format!(
                        "z window [{}, {}] is empty",
                        grid.z_min, grid.z_max
                    )));
                }
                let z_bin_size = config.doublets.cot_theta_max * config.doublets.delta_r_max();
                let bins = if z_bin_size.is_finite() && z_bin_size > 0.0 {
                    ((span_z / z_bin_size).floor() as usize).max(1)
                } else {
                    1
                };
                ZAxis::uniform(grid.z_min, grid.z_max, bins)?
            }
        };
        Ok(Self { phi, z })
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.phi.bins * self.z.bins()
    }

    #[inline]
    pub fn bin_index(&self, phi_bin: usize, z_bin: usize) -> usize {
        phi_bin * self.z.bins() + z_bin
    }

    #[inline]
    pub fn bin_coords(&self, index: usize) -> (usize, usize) {
        (index / self.z.bins(), index % self.z.bins())
    }

    /// Global bin of a (phi, z) location, `None` outside the window.
    #[inline]
    pub fn locate(&self, phi: f32, z: f32) -> Option<usize> {
        Some(self.bin_index(self.phi.bin(phi)?, self.z.bin(z)?))
    }
}

fn derived_phi_bins(config: &SeedFinderConfig, span_phi: f32) -> Result<usize, SeedingError> {
    let grid = &config.grid;
    let triplets = &config.triplets;
    if !(grid.r_max.is_finite() && grid.r_max > 0.0) {
        return Err(SeedingError::InvalidBinning(format!(
            "r_max must be positive, got {}",
            grid.r_max
        )));
    }
    if grid.phi_bin_deflection_coverage == 0 {
        return Err(SeedingError::InvalidBinning(
            "phi_bin_deflection_coverage must be at least 1".into(),
        ));
    }
    if grid.max_phi_bins == 0 {
        return Err(SeedingError::InvalidBinning(
            "max_phi_bins must be at least 1".into(),
        ));
    }

    let min_helix_diameter = 2.0 * helix_radius(triplets.min_pt, triplets.b_field_in_z);
    let deflection = |r: f32| (r / min_helix_diameter).min(1.0).asin();

    let delta_r_max = config.doublets.delta_r_max();
    let outer = deflection(grid.r_max);
    let inner = if grid.r_max > delta_r_max {
        deflection(grid.r_max - delta_r_max)
    } else {
        0.0
    };
    let mut delta_phi = outer - inner;
    let impact_max = triplets.impact_max;
    if impact_max > 0.0 && grid.r_min > impact_max {
        delta_phi += ((impact_max / grid.r_min).asin() - (impact_max / grid.r_max).asin()).abs();
    }
    delta_phi /= grid.phi_bin_deflection_coverage as f32;

    if !(delta_phi.is_finite() && delta_phi > 0.0) {
        warn!(
            "GridLayout: min-pT deflection is saturated (delta_phi={delta_phi}), using a single phi bin"
        );
        return Ok(1);
    }
    let bins = (span_phi / delta_phi).floor() as usize;
    Ok(bins.clamp(1, grid.max_phi_bins))
}
