//! Event-wide de-duplication of seeds sharing their outer points.

use crate::spacepoint::SpacePointId;
use crate::types::Seed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Policy applied after every middle point has been processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GlobalDedup {
    /// Keep every seed emitted by the per-middle filter.
    #[default]
    Disabled,
    /// Keep at most `max_per_pair` seeds with the same (bottom, top) ids.
    CapPerOuterPair { max_per_pair: usize },
}

impl GlobalDedup {
    /// Applies the policy. Survivors keep their discovery order.
    pub fn apply(&self, seeds: Vec<Seed>) -> Vec<Seed> {
        let max_per_pair = match *self {
            GlobalDedup::Disabled => return seeds,
            GlobalDedup::CapPerOuterPair { max_per_pair } => max_per_pair,
        };

        let mut groups: HashMap<(SpacePointId, SpacePointId), Vec<usize>> = HashMap::new();
        for (idx, seed) in seeds.iter().enumerate() {
            groups.entry((seed.bottom, seed.top)).or_default().push(idx);
        }

        let mut keep = vec![false; seeds.len()];
        for members in groups.values_mut() {
            members.sort_by(|&a, &b| {
                seeds[b]
                    .quality
                    .total_cmp(&seeds[a].quality)
                    .then_with(|| seeds[a].middle.cmp(&seeds[b].middle))
            });
            for &idx in members.iter().take(max_per_pair) {
                keep[idx] = true;
            }
        }

        seeds
            .into_iter()
            .zip(keep)
            .filter_map(|(seed, kept)| kept.then_some(seed))
            .collect()
    }
}
