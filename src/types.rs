use crate::spacepoint::SpacePointId;
use serde::{Deserialize, Serialize};

/// Accepted triplet referring back to the caller's hits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub bottom: SpacePointId,
    pub middle: SpacePointId,
    pub top: SpacePointId,
    pub z_vertex: f32, // z of the bottom doublet at r = 0
    pub quality: f32,
}

impl Seed {
    /// Ids ordered by increasing radius.
    pub fn space_points(&self) -> [SpacePointId; 3] {
        [self.bottom, self.middle, self.top]
    }
}
