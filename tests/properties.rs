mod common;

use common::init_logging;
use common::synthetic_event::{random_event, shuffled, SyntheticEvent};
use seed_finder::filter::GlobalDedup;
use seed_finder::{RawSpacePoint, Seed, SeedFinder, SeedFinderConfig};
use std::collections::{BTreeSet, HashMap};

type Triplet = [usize; 3];

/// Binning pinned so that tightening a cut cannot re-bin the event.
fn pinned_config() -> SeedFinderConfig {
    let mut cfg = SeedFinderConfig::default();
    cfg.grid.phi_bins = Some(48);
    cfg.grid.z_bin_edges = Some(vec![-2800.0, -1000.0, -300.0, 300.0, 1000.0, 2800.0]);
    cfg.filter.max_seeds_per_middle = 10_000;
    cfg
}

fn noisy_event() -> SyntheticEvent {
    random_event(50, 250, 2024)
}

fn triplets(seeds: &[Seed]) -> BTreeSet<Triplet> {
    seeds
        .iter()
        .map(|s| s.space_points().map(|id| id.index()))
        .collect()
}

fn run(cfg: SeedFinderConfig, hits: &[RawSpacePoint]) -> Vec<Seed> {
    SeedFinder::new(cfg)
        .expect("finder")
        .find_seeds(hits)
        .expect("seeds")
}

#[test]
fn every_seed_respects_the_doublet_windows() {
    init_logging();
    let event = noisy_event();
    let cfg = pinned_config();
    let seeds = run(cfg.clone(), &event.hits);
    assert!(!seeds.is_empty());

    let cuts = &cfg.doublets;
    let tol = 1e-3;
    for seed in &seeds {
        let [b, m, t] = seed.space_points().map(|id| event.hits[id.index()]);
        let (rb, rm, rt) = (b.radius(), m.radius(), t.radius());
        assert!(rb < rm && rm < rt, "radii not ordered: {rb} {rm} {rt}");

        let dr_bottom = rm - rb;
        let dr_top = rt - rm;
        assert!(dr_bottom >= cuts.delta_r_min_bottom - tol);
        assert!(dr_bottom <= cuts.delta_r_max_bottom + tol);
        assert!(dr_top >= cuts.delta_r_min_top - tol);
        assert!(dr_top <= cuts.delta_r_max_top + tol);

        let cot_bottom = (m.z - b.z) / dr_bottom;
        let cot_top = (t.z - m.z) / dr_top;
        assert!(cot_bottom.abs() <= cuts.cot_theta_max + tol);
        assert!(cot_top.abs() <= cuts.cot_theta_max + tol);

        assert!(seed.z_vertex >= cuts.collision_region_min - tol);
        assert!(seed.z_vertex <= cuts.collision_region_max + tol);
        assert!(seed.quality.is_finite());
    }
}

#[test]
fn every_accepted_point_sits_in_exactly_one_radius_sorted_bin() {
    init_logging();
    let event = noisy_event();
    let finder = SeedFinder::new(SeedFinderConfig::default()).expect("finder");
    let build = finder.build_grid(&event.hits).expect("grid");
    let grid = &build.grid;
    assert_eq!(grid.len() + build.dropped, event.hits.len());

    let layout = grid.layout();
    let mut seen = vec![0usize; grid.len()];
    for bin in 0..grid.num_bins() {
        let entries = grid.bin(bin);
        for &idx in entries {
            seen[idx as usize] += 1;
            let p = grid.point(idx);
            assert_eq!(layout.locate(p.phi, p.z), Some(bin), "point {idx} misplaced");
        }

        let mut sorted = entries.to_vec();
        sorted.sort_by(|&a, &b| grid.point(a).r.total_cmp(&grid.point(b).r));
        let radii = |ids: &[u32]| ids.iter().map(|&i| grid.point(i).r).collect::<Vec<_>>();
        assert_eq!(radii(entries), radii(&sorted), "bin {bin} not sorted by radius");
    }
    assert!(seen.iter().all(|&n| n == 1), "points binned more than once or never");
    assert_eq!(
        build.touched_bins.len(),
        grid.occupied_bins().count(),
        "touched bins disagree with occupancy"
    );
}

#[test]
fn tightening_a_cut_never_adds_seeds() {
    init_logging();
    let event = noisy_event();
    let loose = triplets(&run(pinned_config(), &event.hits));
    assert!(!loose.is_empty());

    let mut tight_delta_r = pinned_config();
    tight_delta_r.doublets.delta_r_max_bottom = 60.0;
    tight_delta_r.doublets.delta_r_max_top = 60.0;

    let mut tight_cot = pinned_config();
    tight_cot.doublets.cot_theta_max = 1.0;

    let mut tight_impact = pinned_config();
    tight_impact.triplets.impact_max = 2.0;

    let mut tight_pt = pinned_config();
    tight_pt.triplets.min_pt = 2000.0;

    for (name, cfg) in [
        ("delta_r_max", tight_delta_r),
        ("cot_theta_max", tight_cot),
        ("impact_max", tight_impact),
        ("min_pt", tight_pt),
    ] {
        let tight = triplets(&run(cfg, &event.hits));
        assert!(
            tight.is_subset(&loose),
            "{name}: {} seeds not in the loose set",
            tight.difference(&loose).count()
        );
        assert!(tight.len() < loose.len(), "{name} removed nothing");
    }
}

#[test]
fn input_order_does_not_change_the_seed_set() {
    init_logging();
    let event = noisy_event();
    let cfg = pinned_config();
    let reference = triplets(&run(cfg.clone(), &event.hits));

    for shuffle_seed in [1u64, 99] {
        let (hits, order) = shuffled(&event.hits, shuffle_seed);
        let permuted: BTreeSet<Triplet> = run(cfg.clone(), &hits)
            .iter()
            .map(|s| s.space_points().map(|id| order[id.index()]))
            .collect();
        assert_eq!(permuted, reference, "shuffle {shuffle_seed}");
    }
}

#[test]
fn parallel_and_sequential_runs_agree() {
    init_logging();
    let event = noisy_event();
    let mut sequential = SeedFinderConfig::default();
    sequential.parallel = false;
    let mut parallel = SeedFinderConfig::default();
    parallel.parallel = true;

    let a = run(sequential, &event.hits);
    let b = run(parallel, &event.hits);
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn seeds_per_middle_are_capped() {
    init_logging();
    let event = noisy_event();
    let mut cfg = SeedFinderConfig::default();
    cfg.filter.max_seeds_per_middle = 2;
    let seeds = run(cfg, &event.hits);
    assert!(!seeds.is_empty());

    let mut per_middle: HashMap<usize, usize> = HashMap::new();
    for seed in &seeds {
        *per_middle.entry(seed.middle.index()).or_default() += 1;
    }
    assert!(per_middle.values().all(|&n| n <= 2), "{per_middle:?}");

    // Within one middle the best seed comes first.
    for pair in seeds.windows(2) {
        if pair[0].middle == pair[1].middle {
            assert!(pair[0].quality >= pair[1].quality);
        }
    }
}

#[test]
fn global_dedup_keeps_a_discovery_ordered_subset() {
    init_logging();
    let event = noisy_event();
    let all = run(SeedFinderConfig::default(), &event.hits);

    let mut cfg = SeedFinderConfig::default();
    cfg.filter.global = GlobalDedup::CapPerOuterPair { max_per_pair: 1 };
    let capped = run(cfg, &event.hits);
    assert!(!capped.is_empty());

    let mut per_pair: HashMap<(usize, usize), usize> = HashMap::new();
    for seed in &capped {
        *per_pair
            .entry((seed.bottom.index(), seed.top.index()))
            .or_default() += 1;
    }
    assert!(per_pair.values().all(|&n| n == 1));
    assert_eq!(per_pair.len(), capped.len());

    // Survivors appear in the same relative order as in the uncapped run.
    let mut rest = all.iter();
    for seed in &capped {
        assert!(rest.any(|s| s == seed), "seed {seed:?} out of order");
    }
}
