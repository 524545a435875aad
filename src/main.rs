use seed_finder::angle::wrap_phi;
use seed_finder::units::{helix_radius, GEV, MEV, MM};
use seed_finder::{RawSpacePoint, SeedFinder, SeedFinderConfig};
use std::f32::consts::TAU;

/// Barrel layer radii of the synthetic detector (mm).
const LAYERS: [f32; 7] = [32.0, 72.0, 116.0, 172.0, 260.0, 360.0, 500.0];

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    // Demo: a deterministic event of prompt helices, one hit per layer.
    let hits = synthetic_event(64);
    let finder = SeedFinder::new(SeedFinderConfig::default()).map_err(|e| e.to_string())?;
    let report = finder
        .find_seeds_with_diagnostics(&hits)
        .map_err(|e| format!("Seeding failed: {e}"))?;
    println!("{}", report.summary());
    for seed in report.seeds.iter().take(10) {
        let [b, m, t] = seed.space_points();
        println!(
            "  seed layers=({}, {}, {}) z_vertex={:.2}mm quality={:.2}",
            hits[b.index()].layer,
            hits[m.index()].layer,
            hits[t.index()].layer,
            seed.z_vertex,
            seed.quality
        );
    }
    Ok(())
}

fn synthetic_event(tracks: usize) -> Vec<RawSpacePoint> {
    let mut hits = Vec::with_capacity(tracks * LAYERS.len());
    for i in 0..tracks {
        let phi0 = wrap_phi(i as f32 * TAU / tracks as f32 + 0.1);
        let pt = 600.0 * MEV + (i % 8) as f32 * 0.5 * GEV;
        let charge = if i % 2 == 0 { 1.0 } else { -1.0 };
        let cot_theta = -1.5 + 3.0 * (i % 11) as f32 / 10.0;
        let z0 = ((i % 5) as f32 - 2.0) * 20.0 * MM;
        let radius = helix_radius(pt, 2.0);

        for (layer, &r) in LAYERS.iter().enumerate() {
            if r >= 2.0 * radius {
                break;
            }
            let alpha = (r / (2.0 * radius)).asin();
            let phi = phi0 + charge * alpha;
            let arc = 2.0 * radius * alpha;
            let z = z0 + cot_theta * arc;
            hits.push(RawSpacePoint {
                layer: layer as u32,
                variance_r: 0.01,
                variance_z: 0.01,
                ..RawSpacePoint::new(r * phi.cos(), r * phi.sin(), z)
            });
        }
    }
    hits
}
