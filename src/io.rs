//! I/O helpers for space point files and JSON reports.
//!
//! - `read_space_points`: `.json` arrays of [`RawSpacePoint`] (variances
//!   taken as given), or text files with
//!   `lxyz <layer> <x> <y> <z> <cov> <width>` lines (other lines are ignored).
//!   `cov` is the measured local covariance and `width` the strip width; see
//!   [`lxyz_variances`].
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::spacepoint::RawSpacePoint;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load the hits of one event.
pub fn read_space_points(path: &Path) -> Result<Vec<RawSpacePoint>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read space points {}: {e}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse space points {}: {e}", path.display()))
    } else {
        parse_lxyz(&contents).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
    }
}

/// Endcap hits start beyond this |z| (mm).
const ENDCAP_Z: f32 = 450.0;
/// Variance assigned to the well-measured direction (mm²).
const PRECISE_VARIANCE: f32 = 0.06;
/// Variance of a uniform distribution over a unit width, 1/12.
const UNIFORM_WIDTH_VARIANCE: f32 = 0.08333;

/// Radial and longitudinal variance of an `lxyz` hit.
///
/// The coarse direction gets `9 · max(width² / 12, cov)`: radial in the
/// barrel, longitudinal in the endcaps (`|z| > 450`).
pub fn lxyz_variances(z: f32, cov: f32, width: f32) -> (f32, f32) {
    let coarse = 9.0 * (width * width * UNIFORM_WIDTH_VARIANCE).max(cov);
    if z.abs() > ENDCAP_Z {
        (PRECISE_VARIANCE, coarse)
    } else {
        (coarse, PRECISE_VARIANCE)
    }
}

/// Parses `lxyz` records; blank lines, comments and other record types are skipped.
pub fn parse_lxyz(contents: &str) -> Result<Vec<RawSpacePoint>, String> {
    let mut hits = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("lxyz") {
            continue;
        }
        let values: Vec<&str> = fields.collect();
        if values.len() < 6 {
            return Err(format!(
                "line {}: expected 6 values after 'lxyz', got {}",
                line_no + 1,
                values.len()
            ));
        }
        let layer: u32 = values[0]
            .parse()
            .map_err(|e| format!("line {}: bad layer '{}': {e}", line_no + 1, values[0]))?;
        let mut numbers = [0.0f32; 5];
        for (slot, raw) in numbers.iter_mut().zip(&values[1..6]) {
            *slot = raw
                .parse()
                .map_err(|e| format!("line {}: bad number '{raw}': {e}", line_no + 1))?;
        }
        let [x, y, z, cov, width] = numbers;
        let (variance_r, variance_z) = lxyz_variances(z, cov, width);
        hits.push(RawSpacePoint {
            x,
            y,
            z,
            variance_r,
            variance_z,
            layer,
        });
    }
    Ok(hits)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
