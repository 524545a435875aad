use crate::filter::CutsConfig;
use crate::finder::SeedFinderConfig;
use crate::units::UnitScale;
use crate::SeedingError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the JSON report; printed to stdout when absent.
    pub json_out: Option<PathBuf>,
    /// Print every seed, not only the summary.
    pub print_seeds: bool,
}

/// Run description consumed by the `seed_demo` tool.
#[derive(Clone, Debug, Deserialize)]
pub struct SeedingRunConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub finder: SeedFinderConfig,
    #[serde(default)]
    pub cuts: CutsConfig,
    /// Units of the hit file; converted to mm on load.
    #[serde(default)]
    pub input_units: UnitScale,
}

impl SeedingRunConfig {
    /// Finder configuration in internal units. A configuration authored with
    /// `in_internal_units = false` is converted with `input_units`.
    pub fn internal_finder_config(&self) -> Result<SeedFinderConfig, SeedingError> {
        if self.finder.in_internal_units {
            Ok(self.finder.clone())
        } else {
            self.finder.to_internal_units(&self.input_units)
        }
    }

    /// Seed cuts in internal units. Cuts carry no unit flag of their own;
    /// they are converted whenever the finder configuration is.
    pub fn internal_cuts(&self) -> CutsConfig {
        if self.finder.in_internal_units {
            self.cuts
        } else {
            self.cuts.to_internal_units(&self.input_units)
        }
    }
}

pub fn load_config(path: &Path) -> Result<SeedingRunConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let mut config: SeedingRunConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if config.input.is_relative() {
        if let Some(dir) = path.parent() {
            config.input = dir.join(&config.input);
        }
    }
    Ok(config)
}
