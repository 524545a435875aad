use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seed_finder::units::helix_radius;
use seed_finder::RawSpacePoint;
use std::f32::consts::PI;

/// Barrel layers of the test detector (mm).
pub const LAYERS: [f32; 5] = [32.0, 72.0, 116.0, 172.0, 260.0];

/// Prompt helix in a solenoid along z.
#[derive(Clone, Copy, Debug)]
pub struct HelixTrack {
    pub phi0: f32,
    pub pt: f32,
    pub charge: f32,
    pub cot_theta: f32,
    pub z0: f32,
}

/// One hit per layer the helix reaches, in layer order.
pub fn helix_hits(track: &HelixTrack, layers: &[f32], b_field: f32) -> Vec<RawSpacePoint> {
    let radius = helix_radius(track.pt, b_field);
    layers
        .iter()
        .enumerate()
        .take_while(|(_, &r)| r < 2.0 * radius)
        .map(|(layer, &r)| {
            let alpha = (r / (2.0 * radius)).asin();
            let phi = track.phi0 + track.charge * alpha;
            let z = track.z0 + track.cot_theta * 2.0 * radius * alpha;
            RawSpacePoint {
                layer: layer as u32,
                ..RawSpacePoint::new(r * phi.cos(), r * phi.sin(), z)
            }
        })
        .collect()
}

/// Hits of one event plus the generating track of every hit (`None` for noise).
#[derive(Clone, Debug)]
pub struct SyntheticEvent {
    pub hits: Vec<RawSpacePoint>,
    pub truth: Vec<Option<usize>>,
    pub tracks: Vec<HelixTrack>,
}

impl SyntheticEvent {
    /// True when all three hits come from the same track.
    pub fn is_pure(&self, ids: [usize; 3]) -> bool {
        match self.truth[ids[0]] {
            Some(track) => ids.iter().all(|&i| self.truth[i] == Some(track)),
            None => false,
        }
    }
}

/// Reproducible event of prompt tracks (1–5 GeV, 2 T) and uniform noise hits
/// on the same layers.
pub fn random_event(tracks: usize, noise: usize, seed: u64) -> SyntheticEvent {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut hits = Vec::new();
    let mut truth = Vec::new();
    let mut generated = Vec::with_capacity(tracks);

    for t in 0..tracks {
        let track = HelixTrack {
            phi0: rng.gen_range(-PI..PI),
            pt: rng.gen_range(1000.0..5000.0),
            charge: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            cot_theta: rng.gen_range(-2.0..2.0),
            z0: rng.gen_range(-50.0..50.0),
        };
        for hit in helix_hits(&track, &LAYERS, 2.0) {
            hits.push(hit);
            truth.push(Some(t));
        }
        generated.push(track);
    }

    for _ in 0..noise {
        let layer = rng.gen_range(0..LAYERS.len());
        let r = LAYERS[layer];
        let phi: f32 = rng.gen_range(-PI..PI);
        let z: f32 = rng.gen_range(-600.0..600.0);
        hits.push(RawSpacePoint {
            layer: layer as u32,
            ..RawSpacePoint::new(r * phi.cos(), r * phi.sin(), z)
        });
        truth.push(None);
    }

    SyntheticEvent {
        hits,
        truth,
        tracks: generated,
    }
}

/// Shuffles `hits`; `order[i]` is the original index of shuffled hit `i`.
pub fn shuffled(hits: &[RawSpacePoint], seed: u64) -> (Vec<RawSpacePoint>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..hits.len()).collect();
    order.shuffle(&mut rng);
    let shuffled = order.iter().map(|&i| hits[i]).collect();
    (shuffled, order)
}
