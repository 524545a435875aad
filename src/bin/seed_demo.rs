use clap::Parser;
use nalgebra::Vector3;
use seed_finder::config::{self, OutputConfig, SeedingRunConfig};
use seed_finder::estimate::estimate_track_params;
use seed_finder::io::{read_space_points, write_json_file};
use seed_finder::units::UnitScale;
use seed_finder::{CutsConfig, RawSpacePoint, SeedFinder, SeedFinderConfig, SeedingReport};
use std::fs;
use std::path::{Path, PathBuf};

/// Run the triplet seed finder on one event and report the seeds.
#[derive(Parser, Debug)]
#[command(name = "seed_demo", version, about)]
struct Cli {
    /// JSON run configuration, or a hit file (.json array or `lxyz` text)
    input: PathBuf,

    /// Print only the one-line summary
    #[arg(long)]
    quiet: bool,

    /// Print a track parameter estimate for every seed
    #[arg(long)]
    estimate: bool,

    /// Write the full JSON report to FILE
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let run_config = resolve_run(&cli.input)?;
    let mut hits = read_space_points(&run_config.input)?;
    if run_config.input_units != UnitScale::INTERNAL {
        hits = hits
            .iter()
            .map(|h| h.scaled(&run_config.input_units))
            .collect();
    }

    let finder_config = run_config
        .internal_finder_config()
        .map_err(|e| format!("Invalid finder configuration: {e}"))?;
    let finder = SeedFinder::new(finder_config)
        .map_err(|e| format!("Invalid finder configuration: {e}"))?
        .with_cuts(run_config.internal_cuts().into_cuts());
    let report = finder
        .find_seeds_with_diagnostics(&hits)
        .map_err(|e| format!("Seeding failed: {e}"))?;

    println!("{}", report.summary());
    if !cli.quiet {
        print_text_summary(&report);
        if run_config.output.print_seeds || cli.estimate {
            print_seeds(&report, &hits, &finder, cli.estimate);
        }
    }

    let json_out = cli.json.as_ref().or(run_config.output.json_out.as_ref());
    if let Some(path) = json_out {
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

/// A JSON object is a run configuration; anything else is a hit file.
fn resolve_run(path: &Path) -> Result<SeedingRunConfig, String> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        if contents.trim_start().starts_with('{') {
            return config::load_config(path);
        }
    }
    Ok(SeedingRunConfig {
        input: path.to_path_buf(),
        output: OutputConfig {
            json_out: None,
            print_seeds: true,
        },
        finder: SeedFinderConfig::default(),
        cuts: CutsConfig::default(),
        input_units: UnitScale::INTERNAL,
    })
}

fn print_text_summary(report: &SeedingReport) {
    let trace = &report.trace;
    println!(
        "\nInput: hits={} accepted={} dropped={}",
        trace.input.hits, trace.input.accepted, trace.input.dropped
    );
    let grid = &trace.grid;
    println!(
        "Grid: phi_bins={} z_bins={} touched={} max_occupancy={}",
        grid.phi_bins, grid.z_bins, grid.touched_bins, grid.max_occupancy
    );
    if !grid.extent.is_empty() {
        println!(
            "  extent r=[{:.1}, {:.1}] z=[{:.1}, {:.1}]",
            grid.extent.r.min, grid.extent.r.max, grid.extent.z.min, grid.extent.z.max
        );
    }
    let search = &trace.search;
    println!(
        "Search: middles={} bottom_doublets={} top_doublets={} triplets={} seeds={}/{}",
        search.middles_visited,
        search.bottom_doublets,
        search.top_doublets,
        search.triplets,
        search.seeds_after_global,
        search.seeds_before_global
    );
    let stages: Vec<String> = trace
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!("Timings (ms): {} total={:.3}", stages.join(" "), trace.timings.total_ms);
}

fn print_seeds(
    report: &SeedingReport,
    hits: &[RawSpacePoint],
    finder: &SeedFinder,
    estimate: bool,
) {
    let beam = finder.config().grid.beam_pos;
    let b_field = finder.config().triplets.b_field_in_z;
    let position = |idx: usize| {
        let h = &hits[idx];
        Vector3::new(h.x - beam[0], h.y - beam[1], h.z)
    };
    println!("\nSeeds");
    for (i, seed) in report.seeds.iter().enumerate() {
        let [b, m, t] = seed.space_points();
        println!(
            "  #{i}: ({}, {}, {}) z_vertex={:.2} quality={:.3}",
            b.0, m.0, t.0, seed.z_vertex, seed.quality
        );
        if !estimate {
            continue;
        }
        match estimate_track_params(
            &position(b.index()),
            &position(m.index()),
            &position(t.index()),
            b_field,
        ) {
            Some(p) => println!(
                "      pt={:.1}MeV d0={:.3}mm phi={:.4} theta={:.4} curvature={:.3e}",
                p.pt, p.d0, p.phi, p.theta, p.curvature
            ),
            None => println!("      estimate: degenerate"),
        }
    }
}
